//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No entry for this word.
    #[error("word not found: {0}")]
    NotFound(String),

    /// An entry for this word is already stored.
    #[error("word already exists: {0}")]
    AlreadyExists(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV encoding/decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The repository was closed.
    #[error("repository is closed")]
    Closed,

    /// A thread panicked while holding the repository lock.
    #[error("repository lock poisoned")]
    LockPoisoned,
}
