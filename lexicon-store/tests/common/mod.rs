//! Shared test helpers for store tests.

#![allow(dead_code)]

use lexicon_storage::{
    CsvWordRepository, SqliteWordRepository, StorageError, StorageResult, WordRepository,
};
use lexicon_store::{MutationEvent, SnapshotSink};
use lexicon_types::WordEntry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

pub fn sqlite_repo() -> Arc<dyn WordRepository> {
    Arc::new(SqliteWordRepository::open_in_memory().unwrap())
}

pub fn csv_repo(path: &std::path::Path) -> Arc<dyn WordRepository> {
    Arc::new(CsvWordRepository::open(path).unwrap())
}

/// Records every event it is handed.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<(u64, Vec<WordEntry>)>>,
    pub delay: Option<Duration>,
}

impl RecordingSink {
    pub fn slow(delay: Duration) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }

    pub fn revisions(&self) -> Vec<u64> {
        self.events.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }

    pub fn last(&self) -> Option<(u64, Vec<WordEntry>)> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl SnapshotSink for RecordingSink {
    fn refresh(&self, event: &MutationEvent) -> StorageResult<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.events
            .lock()
            .unwrap()
            .push((event.revision, event.entries()));
        Ok(())
    }
}

/// Blocks every refresh until [`GatedSink::release`] is called.
#[derive(Default)]
pub struct GatedSink {
    open: Mutex<bool>,
    opened: Condvar,
    pub revisions: Mutex<Vec<u64>>,
}

impl GatedSink {
    pub fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl SnapshotSink for GatedSink {
    fn refresh(&self, event: &MutationEvent) -> StorageResult<()> {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
        drop(open);
        self.revisions.lock().unwrap().push(event.revision);
        Ok(())
    }
}

/// Always fails.
pub struct FailingSink;

impl SnapshotSink for FailingSink {
    fn refresh(&self, _event: &MutationEvent) -> StorageResult<()> {
        Err(StorageError::Io(std::io::Error::other("mirror unavailable")))
    }
}

/// Wraps a real repository and fails writes while `broken` is set.
pub struct FlakyRepo {
    pub inner: Arc<dyn WordRepository>,
    pub broken: AtomicBool,
}

impl FlakyRepo {
    pub fn new(inner: Arc<dyn WordRepository>) -> Self {
        Self {
            inner,
            broken: AtomicBool::new(false),
        }
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl WordRepository for FlakyRepo {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    fn add_word(&self, word: &str, definition: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.add_word(word, definition)
    }

    fn delete_word(&self, word: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.delete_word(word)
    }

    fn update_word(&self, word: &str, new_definition: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.update_word(word, new_definition)
    }

    fn get_word(&self, word: &str) -> StorageResult<WordEntry> {
        self.inner.get_word(word)
    }

    fn list_words(&self) -> StorageResult<Vec<WordEntry>> {
        self.inner.list_words()
    }

    fn close(&self) -> StorageResult<()> {
        self.inner.close()
    }
}
