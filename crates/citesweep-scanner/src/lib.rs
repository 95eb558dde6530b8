//! CiteSweep Scanner - citation harvesting and enrichment pipelines.
//!
//! This crate sweeps an (agency, citation number) space against the lookup
//! service, records every citation it discovers, and later expands discovered
//! citations into fully detailed records.
//!
//! # Features
//!
//! - Randomized, round-robin enumeration of the query space with backpressure
//! - Concurrent lookup workers with configurable parallelism
//! - Shared cache of absent agencies that skips their remaining queries
//! - Cooldown on the service's nightly blank-record window
//! - Append-only CSV result store flushed after every row
//! - Detail enrichment pool that aborts on the first transport error
//!
//! # Example
//!
//! ```rust,ignore
//! use citesweep_scanner::{HarvestOrchestrator, QuerySpace, ResultSink};
//! use std::sync::Arc;
//!
//! let orchestrator = HarvestOrchestrator::new(Arc::new(client)).with_concurrency(16);
//! let sink = ResultSink::open_append("output.csv".as_ref())?;
//! let stats = orchestrator
//!     .run(QuerySpace::new(0, 500, 100_000, 999_999), &mut rng, sink)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod absence;
pub mod downtime;
pub mod enrich;
#[allow(missing_docs)]
pub mod error;
pub mod generator;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
pub mod sink;

// Re-export commonly used types
pub use absence::AbsenceCache;
pub use downtime::DowntimeDetector;
pub use enrich::{
    fill_details, parse_basic_records, read_basic_records, EnrichStats, EnrichmentPipeline,
};
pub use error::{Result, ScanError};
pub use generator::QuerySpace;
pub use orchestrator::{process_query, HarvestOrchestrator, HarvestStats, QueryOutcome};
pub use parser::{classify_search_page, parse_detail_page, SearchFields, SearchPage};
pub use sink::{DetailSink, ResultSink, SinkCounters};
