//! CiteSweep Core - Foundation crate for the CiteSweep harvester.
//!
//! This crate provides the shared record types, error handling, and
//! configuration management that the client, scanner, and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Query, lookup result, and enriched citation records
//!
//! # Example
//!
//! ```rust
//! use citesweep_core::{AppConfig, Query};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.harvest.concurrency, 16);
//!
//! let query = Query::new(12, "100042");
//! assert_eq!(query.citation_number, "100042");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, EnrichConfig, HarvestConfig, ServiceConfig};
pub use error::{CiteSweepError, ConfigError, ConfigResult, Result};
pub use types::{
    AgencyId, CitationInfo, LookupResult, Query, Violation, BASIC_FIELD_COUNT,
    DETAIL_FIELD_NAMES,
};
