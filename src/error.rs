//! Error types for the storage and export seams.
//!
//! The event log and the classifier never hand these to their callers; they
//! surface only through the diagnostic hook and the export/storage APIs.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("storage operation failed: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
