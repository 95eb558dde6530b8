//! Transport trait for the lookup service.

use crate::error::Result;
use async_trait::async_trait;
use citesweep_core::{CitationInfo, Query};

/// Fetches raw page markup from the citation lookup service.
///
/// Implementations should be thread-safe (Send + Sync); a single instance is
/// shared by every worker of a pipeline.
#[async_trait]
pub trait CitationLookup: Send + Sync {
    /// Fetch the search page for one (agency, citation number) pair.
    ///
    /// # Errors
    /// Returns error on connection failure or if the body cannot be read.
    async fn search(&self, query: &Query) -> Result<String>;

    /// Fetch the detail page for a previously discovered citation.
    ///
    /// Only the basic fields of `citation` are used to build the request.
    ///
    /// # Errors
    /// Returns error on connection failure or if the body cannot be read.
    async fn details(&self, citation: &CitationInfo) -> Result<String>;
}
