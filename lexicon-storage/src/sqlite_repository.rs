//! SQLite-backed repository.

use crate::error::{StorageError, StorageResult};
use crate::repository::WordRepository;
use lexicon_types::WordEntry;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Repository persisting to a single SQLite table.
pub struct SqliteWordRepository {
    /// `None` once closed.
    conn: Mutex<Option<Connection>>,
}

impl SqliteWordRepository {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!("Opened SQLite database at {:?}", path);
        Self::with_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL UNIQUE,
                definition TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Runs `f` against the open connection.
    fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;
        f(conn)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl WordRepository for SqliteWordRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn add_word(&self, word: &str, definition: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO words (word, definition) VALUES (?1, ?2)",
                params![word, definition],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::AlreadyExists(word.to_string())
                } else {
                    e.into()
                }
            })?;
            Ok(())
        })
    }

    fn delete_word(&self, word: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM words WHERE word = ?1", params![word])?;
            if changed == 0 {
                return Err(StorageError::NotFound(word.to_string()));
            }
            Ok(())
        })
    }

    fn update_word(&self, word: &str, new_definition: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE words SET definition = ?1 WHERE word = ?2",
                params![new_definition, word],
            )?;
            if changed == 0 {
                return Err(StorageError::NotFound(word.to_string()));
            }
            Ok(())
        })
    }

    fn get_word(&self, word: &str) -> StorageResult<WordEntry> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT word, definition FROM words WHERE word = ?1",
                params![word],
                |row| Ok(WordEntry::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(word.to_string()))
        })
    }

    fn list_words(&self) -> StorageResult<Vec<WordEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT word, definition FROM words ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(WordEntry::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
    }

    fn close(&self) -> StorageResult<()> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StorageError::Database(e))?;
            debug!("Closed SQLite repository");
        }
        Ok(())
    }
}
