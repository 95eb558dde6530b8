//! Maintenance-window heuristic for the search page.
//!
//! The service has a nightly window during which matching records come back
//! with every cell blank. A match without a date is treated as that window:
//! the result is discarded and the worker that saw it backs off.

use citesweep_core::LookupResult;
use std::time::Duration;

/// Default pause applied to a worker after a degraded response.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Per-worker downtime detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DowntimeDetector {
    cooldown: Duration,
}

impl Default for DowntimeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl DowntimeDetector {
    /// Create a detector with the given cooldown.
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Cooldown applied on each detection.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether `result` carries the degraded-service signature.
    #[must_use]
    pub fn is_degraded(result: &LookupResult) -> bool {
        result.found && result.date.is_empty()
    }

    /// Suspend the calling worker for the cooldown.
    pub async fn cool_down(&self, worker_id: usize) {
        tracing::warn!(
            "Worker {} got an empty date, service looks down; sleeping {:?}",
            worker_id,
            self.cooldown
        );
        tokio::time::sleep(self.cooldown).await;
    }
}
