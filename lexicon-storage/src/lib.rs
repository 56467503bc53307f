//! Storage layer for Lexicon.
//!
//! Defines the [`WordRepository`] port the store coordinator persists through,
//! and the two interchangeable adapters behind it.
//!
//! # Backends
//!
//! - [`CsvWordRepository`]: one `word,definition` record per line, no header,
//!   rewritten in full on every mutation
//! - [`SqliteWordRepository`]: a single `words` table with a uniqueness
//!   constraint on `word`
//!
//! Both report the same error taxonomy ([`StorageError::NotFound`],
//! [`StorageError::AlreadyExists`], and backend failures) so callers never
//! branch on the backend.

mod csv_file;
mod csv_repository;
mod error;
mod repository;
mod sqlite_repository;

pub use csv_file::{read_entries, write_entries};
pub use csv_repository::CsvWordRepository;
pub use error::{StorageError, StorageResult};
pub use repository::{open_repository, Backend, RepositoryConfig, WordRepository};
pub use sqlite_repository::SqliteWordRepository;
