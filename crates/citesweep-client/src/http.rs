//! reqwest-backed implementation of [`CitationLookup`].

use crate::error::Result;
use crate::lookup::CitationLookup;
use crate::url_builder::{build_detail_url, build_search_url, normalize_base_url};
use async_trait::async_trait;
use citesweep_core::{CitationInfo, Query, ServiceConfig};
use reqwest::Client;
use url::Url;

/// HTTP client for the search and detail pages.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every worker.
pub struct HttpLookupClient {
    client: Client,
    base_url: Url,
}

impl HttpLookupClient {
    /// Create a client from service settings.
    ///
    /// # Errors
    /// Returns error if the base URL is malformed or the HTTP client cannot be
    /// created.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base_url(&config.base_url)?,
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a page and return its body.
    ///
    /// The status code is not checked; the service reports misses inside the
    /// page body, so every body is handed to the classifier.
    async fn fetch(&self, url: Url) -> Result<String> {
        tracing::trace!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Lookup service answered HTTP {}", status.as_u16());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CitationLookup for HttpLookupClient {
    async fn search(&self, query: &Query) -> Result<String> {
        let url = build_search_url(&self.base_url, query)?;
        self.fetch(url).await
    }

    async fn details(&self, citation: &CitationInfo) -> Result<String> {
        let url = build_detail_url(&self.base_url, citation)?;
        self.fetch(url).await
    }
}
