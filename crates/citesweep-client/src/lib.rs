//! CiteSweep Client - transport for the remote citation lookup service.
//!
//! The scanner never talks HTTP directly. It goes through the
//! [`CitationLookup`] trait, which returns the raw markup of either the search
//! page or the detail page. [`HttpLookupClient`] is the production
//! implementation; tests substitute in-memory mocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use citesweep_client::{CitationLookup, HttpLookupClient};
//! use citesweep_core::{Query, ServiceConfig};
//!
//! let client = HttpLookupClient::new(&ServiceConfig::default())?;
//! let body = client.search(&Query::new(12, "100042")).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod http;
pub mod lookup;
#[allow(missing_docs)]
pub mod url_builder;

pub use error::{ClientError, Result};
pub use http::HttpLookupClient;
pub use lookup::CitationLookup;
pub use url_builder::{build_detail_url, build_search_url, normalize_base_url};
