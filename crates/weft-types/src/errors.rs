//! Error taxonomy for engine operations
//!
//! Absence (no previous version, no persisted definition) is never an
//! error; lookups return `Option` instead. Only the interceptor chain and
//! the storage layer translate low-level faults into these variants.

/// Errors an engine command can fail with
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The command input is invalid (e.g. duplicate definition keys in one
    /// deployment). Fails the whole command before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Optimistic concurrency clash detected at commit time. The only
    /// retryable class: retries re-execute the command from scratch.
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    /// A required collaborator or setting is missing or unusable. Fatal,
    /// never retried.
    #[error("engine configuration error: {0}")]
    Configuration(String),

    /// Underlying storage fault that is neither a conflict nor expected
    /// absence.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Whether the retry stage may re-execute after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
