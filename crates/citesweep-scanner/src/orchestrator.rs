//! Harvest orchestrator for sweeping the citation search space.
//!
//! This module provides the `HarvestOrchestrator`, which wires the query
//! generator, a pool of lookup workers, and the result sink together:
//!
//! ```text
//! generator -> bounded query queue -> N workers -> result queue -> sink
//! ```
//!
//! Workers consult the shared [`AbsenceCache`] before every lookup and back
//! off through the [`DowntimeDetector`] when the service returns blank
//! matches. Transport errors drop the query; there are no retries.

use crate::absence::AbsenceCache;
use crate::downtime::DowntimeDetector;
use crate::error::Result;
use crate::generator::QuerySpace;
use crate::parser::{classify_search_page, SearchPage};
use crate::sink::ResultSink;
use citesweep_client::{CitationLookup, ClientError};
use citesweep_core::{HarvestConfig, LookupResult, Query};
use rand::Rng;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Default number of lookup workers.
const DEFAULT_CONCURRENCY: usize = 16;

/// Default capacity of the query and result queues.
const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of processed results between progress lines.
const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// What a worker did with one query.
#[derive(Debug)]
pub enum QueryOutcome {
    /// A result to forward to the sink
    Emit(LookupResult),
    /// The lookup failed at the transport level; the query is dropped
    Dropped(ClientError),
    /// The response carried the downtime signature; the query is dropped
    Degraded,
}

/// Summary of a finished harvest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Queries the generator emitted
    pub generated: u64,
    /// Results that reached the sink
    pub processed: u64,
    /// Positive results written to the store
    pub found: u64,
    /// Distinct agencies found to be absent
    pub absent_agencies: usize,
    /// Queries dropped because of transport errors
    pub transport_errors: u64,
    /// Queries dropped because of the downtime signature
    pub downtime_events: u64,
}

#[derive(Debug, Default)]
struct WorkerCounters {
    transport_errors: AtomicU64,
    downtime_events: AtomicU64,
}

/// Orchestrates one sweep over a [`QuerySpace`].
pub struct HarvestOrchestrator {
    /// Transport used for search page lookups
    lookup: Arc<dyn CitationLookup>,
    /// Agencies known to have no record system
    absent: Arc<AbsenceCache>,
    /// Backoff applied on degraded responses
    detector: DowntimeDetector,
    /// Number of lookup workers
    concurrency: usize,
    /// Capacity of the bounded queues
    queue_capacity: usize,
    /// Results between progress lines
    progress_interval: u64,
}

impl HarvestOrchestrator {
    /// Create a new harvest orchestrator with default settings.
    #[must_use]
    pub fn new(lookup: Arc<dyn CitationLookup>) -> Self {
        Self {
            lookup,
            absent: Arc::new(AbsenceCache::new()),
            detector: DowntimeDetector::default(),
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Create an orchestrator from harvest settings.
    #[must_use]
    pub fn from_config(lookup: Arc<dyn CitationLookup>, config: &HarvestConfig) -> Self {
        Self::new(lookup)
            .with_concurrency(config.concurrency)
            .with_queue_capacity(config.queue_capacity)
            .with_progress_interval(config.progress_interval)
            .with_downtime_cooldown(config.downtime_cooldown())
    }

    /// Set the number of lookup workers (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    /// Set the capacity of the bounded queues (at least one).
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set how many results pass between progress lines (0 disables them).
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the pause applied to a worker after a degraded response.
    #[must_use]
    pub fn with_downtime_cooldown(mut self, cooldown: Duration) -> Self {
        self.detector = DowntimeDetector::new(cooldown);
        self
    }

    /// Share an existing absence cache instead of starting empty.
    #[must_use]
    pub fn with_absence_cache(mut self, absent: Arc<AbsenceCache>) -> Self {
        self.absent = absent;
        self
    }

    /// Absence cache used by this orchestrator's workers.
    #[must_use]
    pub fn absence_cache(&self) -> &Arc<AbsenceCache> {
        &self.absent
    }

    /// Sweep `space` once, writing positive results to `sink`.
    ///
    /// The citation permutation is drawn from `rng` up front. Returns once the
    /// generator is exhausted, every worker has exited, and the sink has
    /// drained the result queue. Only sink failures and task panics are errors.
    pub async fn run<R, W>(
        &self,
        space: QuerySpace,
        rng: &mut R,
        mut sink: ResultSink<W>,
    ) -> Result<HarvestStats>
    where
        R: Rng + ?Sized,
        W: Write + Send + 'static,
    {
        tracing::info!(
            "Starting harvest of {} queries ({} agencies x {} citations) with {} workers",
            space.len(),
            space.agency_count(),
            space.citation_count(),
            self.concurrency
        );

        let permutation = space.permutation(rng);
        let (query_tx, query_rx) = mpsc::channel::<Query>(self.queue_capacity);
        let (result_tx, result_rx) = mpsc::channel::<LookupResult>(self.queue_capacity);

        let generator = tokio::spawn(space.feed(permutation, query_tx));

        let queries = Arc::new(Mutex::new(query_rx));
        let counters = Arc::new(WorkerCounters::default());
        let mut workers = JoinSet::new();
        for worker_id in 0..self.concurrency {
            workers.spawn(lookup_worker(
                worker_id,
                self.lookup.clone(),
                self.absent.clone(),
                self.detector,
                queries.clone(),
                result_tx.clone(),
                counters.clone(),
            ));
        }
        // The sink's stream ends when the last worker drops its sender.
        drop(result_tx);
        drop(queries);

        let absent = self.absent.clone();
        let progress_interval = self.progress_interval;
        let sink_task = tokio::task::spawn_blocking(move || {
            sink.drain(result_rx, &absent, progress_interval)
        });

        while let Some(joined) = workers.join_next().await {
            joined?;
        }
        let generated = generator.await?;
        let sink_counters = sink_task.await??;

        let stats = HarvestStats {
            generated,
            processed: sink_counters.processed,
            found: sink_counters.found,
            absent_agencies: self.absent.len(),
            transport_errors: counters.transport_errors.load(Ordering::Relaxed),
            downtime_events: counters.downtime_events.load(Ordering::Relaxed),
        };
        tracing::info!(
            "Harvest complete: found {}/{} queries ({} absent agencies, {} transport errors, {} downtime events)",
            stats.found,
            stats.processed,
            stats.absent_agencies,
            stats.transport_errors,
            stats.downtime_events
        );
        Ok(stats)
    }
}

/// Resolve one query: absence fast path, lookup, classification.
pub async fn process_query(
    lookup: &dyn CitationLookup,
    absent: &AbsenceCache,
    query: Query,
) -> QueryOutcome {
    if absent.contains(query.agency) {
        return QueryOutcome::Emit(LookupResult::not_found(query));
    }

    let body = match lookup.search(&query).await {
        Ok(body) => body,
        Err(e) => return QueryOutcome::Dropped(e),
    };

    match classify_search_page(&body) {
        SearchPage::AgencyNotFound => {
            if absent.insert(query.agency) {
                tracing::debug!("Agency {} has no record system", query.agency);
            }
            QueryOutcome::Emit(LookupResult::not_found(query))
        }
        SearchPage::NoCitations => QueryOutcome::Emit(LookupResult::not_found(query)),
        SearchPage::Match(fields) => {
            let result = fields.into_result(query);
            if DowntimeDetector::is_degraded(&result) {
                QueryOutcome::Degraded
            } else {
                QueryOutcome::Emit(result)
            }
        }
    }
}

async fn lookup_worker(
    worker_id: usize,
    lookup: Arc<dyn CitationLookup>,
    absent: Arc<AbsenceCache>,
    detector: DowntimeDetector,
    queries: Arc<Mutex<mpsc::Receiver<Query>>>,
    results: mpsc::Sender<LookupResult>,
    counters: Arc<WorkerCounters>,
) {
    loop {
        // Hold the lock only while waiting for the next query.
        let next = queries.lock().await.recv().await;
        let Some(query) = next else {
            break;
        };

        match process_query(lookup.as_ref(), &absent, query).await {
            QueryOutcome::Emit(result) => {
                if results.send(result).await.is_err() {
                    tracing::warn!("Result queue closed, worker {} exiting", worker_id);
                    break;
                }
            }
            QueryOutcome::Dropped(e) => {
                counters.transport_errors.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Lookup failed, dropping query: {}", e);
            }
            QueryOutcome::Degraded => {
                counters.downtime_events.fetch_add(1, Ordering::Relaxed);
                detector.cool_down(worker_id).await;
            }
        }
    }
    tracing::debug!("Worker {} finished", worker_id);
}
