//! Error types for the transport layer.

use thiserror::Error;

/// Errors that can occur while talking to the lookup service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection failure, timeout, or a body that could not be read
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL or a derived request URL is malformed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error raised by a non-HTTP lookup implementation
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, ClientError>;
