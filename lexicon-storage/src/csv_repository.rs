//! CSV-file-backed repository.
//!
//! The whole file is held in memory and rewritten after each mutation. The
//! in-memory copy is only replaced once the rewrite has succeeded, so a
//! failed write leaves both views at the previous state.

use crate::csv_file::{read_entries, write_entries};
use crate::error::{StorageError, StorageResult};
use crate::repository::WordRepository;
use lexicon_types::WordEntry;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Repository persisting to a flat CSV file.
pub struct CsvWordRepository {
    path: PathBuf,
    /// `None` once closed.
    entries: Mutex<Option<Vec<WordEntry>>>,
}

impl CsvWordRepository {
    /// Opens the CSV file at `path`, loading existing records.
    /// A missing file starts an empty dictionary.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path)?;
        debug!("Loaded {} entries from {:?}", entries.len(), path);
        Ok(Self {
            path,
            entries: Mutex::new(Some(entries)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Option<Vec<WordEntry>>>> {
        self.entries.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Applies `change` to a copy of the entries, persists it, then commits.
    fn mutate<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Vec<WordEntry>) -> StorageResult<()>,
    {
        let mut guard = self.lock()?;
        let current = guard.as_ref().ok_or(StorageError::Closed)?;
        let mut next = current.clone();
        change(&mut next)?;
        write_entries(&self.path, &next)?;
        *guard = Some(next);
        Ok(())
    }
}

impl WordRepository for CsvWordRepository {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    fn add_word(&self, word: &str, definition: &str) -> StorageResult<()> {
        self.mutate(|entries| {
            if entries.iter().any(|e| e.word == word) {
                return Err(StorageError::AlreadyExists(word.to_string()));
            }
            entries.push(WordEntry::new(word, definition));
            Ok(())
        })
    }

    fn delete_word(&self, word: &str) -> StorageResult<()> {
        self.mutate(|entries| {
            let before = entries.len();
            entries.retain(|e| e.word != word);
            if entries.len() == before {
                return Err(StorageError::NotFound(word.to_string()));
            }
            Ok(())
        })
    }

    fn update_word(&self, word: &str, new_definition: &str) -> StorageResult<()> {
        self.mutate(|entries| {
            let entry = entries
                .iter_mut()
                .find(|e| e.word == word)
                .ok_or_else(|| StorageError::NotFound(word.to_string()))?;
            entry.definition = new_definition.to_string();
            Ok(())
        })
    }

    fn get_word(&self, word: &str) -> StorageResult<WordEntry> {
        let guard = self.lock()?;
        let entries = guard.as_ref().ok_or(StorageError::Closed)?;
        entries
            .iter()
            .find(|e| e.word == word)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(word.to_string()))
    }

    fn list_words(&self) -> StorageResult<Vec<WordEntry>> {
        let guard = self.lock()?;
        guard.as_ref().cloned().ok_or(StorageError::Closed)
    }

    fn close(&self) -> StorageResult<()> {
        let mut guard = self.lock()?;
        if guard.take().is_some() {
            debug!("Closed CSV repository at {:?}", self.path);
        }
        Ok(())
    }
}
