//! Error types for the storage crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage error types.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Not found error.
    #[error("Resource not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file exists but does not hold a run record.
    #[error("Invalid record {}: {reason}", .path.display())]
    InvalidRecord { path: PathBuf, reason: String },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
