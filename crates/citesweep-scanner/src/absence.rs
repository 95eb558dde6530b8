//! Memo of agencies confirmed to have no record system.
//!
//! The cache only grows during a run and is never persisted. Workers read it
//! before every lookup and insert into it when the service answers
//! "agency not found".

use citesweep_core::AgencyId;
use dashmap::DashSet;

/// Concurrency-safe set of absent agency IDs.
#[derive(Debug, Default)]
pub struct AbsenceCache {
    agencies: DashSet<AgencyId>,
}

impl AbsenceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `agency` is known to be absent.
    #[must_use]
    pub fn contains(&self, agency: AgencyId) -> bool {
        self.agencies.contains(&agency)
    }

    /// Record `agency` as absent.
    ///
    /// Returns `true` only for the caller that added it; repeated inserts of
    /// the same ID are no-ops.
    pub fn insert(&self, agency: AgencyId) -> bool {
        self.agencies.insert(agency)
    }

    /// Number of distinct absent agencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agencies.len()
    }

    /// Whether no agency has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
    }
}
