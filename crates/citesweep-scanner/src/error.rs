use citesweep_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Detail lookup failed for citation {citation}: {source}")]
    DetailLookup {
        citation: String,
        #[source]
        source: ClientError,
    },

    #[error("Invalid input record at row {row}: expected {expected} fields, got {found}")]
    Schema {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("No input records in {path}")]
    EmptyInput { path: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
