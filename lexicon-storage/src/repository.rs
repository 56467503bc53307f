//! The repository port and backend selection.

use crate::csv_repository::CsvWordRepository;
use crate::error::StorageResult;
use crate::sqlite_repository::SqliteWordRepository;
use lexicon_types::WordEntry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Durable CRUD for word/definition pairs.
///
/// Implementations are blocking; async callers should run them on a
/// blocking thread. Every method after [`WordRepository::close`] fails with
/// [`crate::StorageError::Closed`].
pub trait WordRepository: Send + Sync {
    /// Short backend identifier used in logs.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new entry. Fails with `AlreadyExists` on a duplicate word.
    fn add_word(&self, word: &str, definition: &str) -> StorageResult<()>;

    /// Deletes an entry. Fails with `NotFound` if absent.
    fn delete_word(&self, word: &str) -> StorageResult<()>;

    /// Replaces the definition of an entry. Fails with `NotFound` if absent.
    fn update_word(&self, word: &str, new_definition: &str) -> StorageResult<()>;

    /// Looks up an entry. Fails with `NotFound` if absent.
    fn get_word(&self, word: &str) -> StorageResult<WordEntry>;

    /// Returns every stored entry in insertion order.
    fn list_words(&self) -> StorageResult<Vec<WordEntry>>;

    /// Releases backend resources. Closing twice is a no-op.
    fn close(&self) -> StorageResult<()>;
}

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Flat CSV file.
    Csv,
    /// SQLite database file.
    #[default]
    Sqlite,
}

impl Backend {
    /// File used when no location is configured.
    pub fn default_location(&self) -> PathBuf {
        match self {
            Backend::Csv => PathBuf::from("dictionary.csv"),
            Backend::Sqlite => PathBuf::from("dictionary.db"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Csv => write!(f, "csv"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Backend::Csv),
            "sqlite" | "sql" | "db" => Ok(Backend::Sqlite),
            other => Err(format!("unknown backend '{other}' (expected csv or sqlite)")),
        }
    }
}

/// Where and how to open the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Backend to use.
    pub backend: Backend,
    /// File path of the CSV file or SQLite database.
    pub location: PathBuf,
}

impl RepositoryConfig {
    /// Config for `backend` at its default location.
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            location: backend.default_location(),
        }
    }

    /// Overrides the location.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new(Backend::default())
    }
}

/// Opens (or creates) the configured backend.
pub fn open_repository(config: &RepositoryConfig) -> StorageResult<Arc<dyn WordRepository>> {
    let repo: Arc<dyn WordRepository> = match config.backend {
        Backend::Csv => Arc::new(CsvWordRepository::open(&config.location)?),
        Backend::Sqlite => Arc::new(SqliteWordRepository::open(&config.location)?),
    };
    tracing::info!(
        "Opened {} repository at {:?}",
        repo.backend_name(),
        config.location
    );
    Ok(repo)
}
