//! Error types for the store coordinator.

use lexicon_storage::StorageError;
use lexicon_types::ValidationError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by [`crate::WordStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected input.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Insert of a word that is already stored.
    #[error("word already exists: {0}")]
    AlreadyExists(String),

    /// Edit, remove or get of a word that is not stored.
    #[error("word not found: {0}")]
    NotFound(String),

    /// Backend failure, passed through unchanged.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// The blocking worker running the operation panicked or was aborted.
    #[error("store task failed: {0}")]
    Task(String),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(word) => StoreError::NotFound(word),
            StorageError::AlreadyExists(word) => StoreError::AlreadyExists(word),
            other => StoreError::Storage(other),
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}
