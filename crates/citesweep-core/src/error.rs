//! Core error types for CiteSweep.
//!
//! `CiteSweepError` covers record-level failures; the configuration layer
//! reports through `ConfigError`. Crates further up the stack wrap both in
//! their own enums.

use thiserror::Error;

/// Error type for record operations.
#[derive(Error, Debug)]
pub enum CiteSweepError {
    /// A stored record does not have the expected number of fields
    #[error("invalid size of input record: expected {expected} fields, got {found}")]
    Schema {
        /// Number of fields the schema requires
        expected: usize,
        /// Number of fields actually present
        found: usize,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found at an explicitly requested path
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `CiteSweepError`.
pub type Result<T> = std::result::Result<T, CiteSweepError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
