//! Storage error types

use weft_types::EngineError;

/// Errors reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency clash detected while applying a batch
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other backend fault
    #[error("storage failure: {0}")]
    Internal(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => EngineError::Conflict(msg),
            StoreError::Internal(msg) => EngineError::Storage(msg),
        }
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
