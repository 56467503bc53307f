//! Completion notifications and secondary snapshot refresh.

use lexicon_storage::{write_entries, StorageResult};
use lexicon_types::WordEntry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events in flight between mutators and the notifier task.
pub(crate) const NOTIFY_CAPACITY: usize = 1;

/// Which mutation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Added,
    Edited,
    Removed,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Added => write!(f, "added"),
            MutationKind::Edited => write!(f, "edited"),
            MutationKind::Removed => write!(f, "removed"),
        }
    }
}

/// A durably persisted mutation, with the dictionary as it stood right after.
#[derive(Debug, Clone)]
pub struct MutationEvent {
    /// Revision produced by this mutation. Strictly increasing.
    pub revision: u64,
    /// What happened.
    pub kind: MutationKind,
    /// The word that was touched.
    pub word: String,
    pub(crate) entries: Arc<BTreeMap<String, String>>,
}

impl MutationEvent {
    /// The full post-mutation dictionary, ordered by word.
    pub fn entries(&self) -> Vec<WordEntry> {
        self.entries
            .iter()
            .map(|(word, definition)| WordEntry::new(word.as_str(), definition.as_str()))
            .collect()
    }

    /// Number of entries after the mutation.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary was empty after the mutation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Secondary synchronization target refreshed after each mutation.
///
/// Called from a blocking thread. Errors are logged, never propagated.
pub trait SnapshotSink: Send + Sync {
    fn refresh(&self, event: &MutationEvent) -> StorageResult<()>;
}

/// Mirrors the dictionary to a flat CSV file, independent of the primary backend.
#[derive(Debug, Clone)]
pub struct CsvMirror {
    path: PathBuf,
}

impl CsvMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for CsvMirror {
    fn refresh(&self, event: &MutationEvent) -> StorageResult<()> {
        write_entries(&self.path, &event.entries())
    }
}

/// Creates the notification channel.
pub(crate) fn channel() -> (mpsc::Sender<MutationEvent>, mpsc::Receiver<MutationEvent>) {
    mpsc::channel(NOTIFY_CAPACITY)
}

/// Consumes events until every sender is dropped.
///
/// Events that arrive out of order are skipped once a newer revision has
/// been applied.
pub(crate) async fn run_notifier(
    mut rx: mpsc::Receiver<MutationEvent>,
    sink: Option<Arc<dyn SnapshotSink>>,
) {
    let mut applied = 0u64;

    while let Some(event) = rx.recv().await {
        if event.revision <= applied {
            debug!(
                "Skipping stale notification (revision {} <= {})",
                event.revision, applied
            );
            continue;
        }
        applied = event.revision;

        let Some(sink) = sink.as_ref().map(Arc::clone) else {
            debug!(
                "Mutation {} '{}' at revision {}",
                event.kind, event.word, event.revision
            );
            continue;
        };

        let revision = event.revision;
        match tokio::task::spawn_blocking(move || sink.refresh(&event)).await {
            Ok(Ok(())) => debug!("Snapshot refreshed at revision {}", revision),
            Ok(Err(e)) => warn!("Snapshot refresh failed at revision {}: {}", revision, e),
            Err(e) => warn!("Snapshot refresh panicked at revision {}: {}", revision, e),
        }
    }

    debug!("Notifier stopped after revision {}", applied);
}
