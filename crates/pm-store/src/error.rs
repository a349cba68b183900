//! Snapshot persistence error types.

use thiserror::Error;

/// Errors that can occur while loading or saving snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
