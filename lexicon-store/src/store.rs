//! The store coordinator.
//!
//! Each mutation runs start to finish on one blocking worker that owns the
//! write guard: the existence check, the repository write, the snapshot
//! update and the notification hand-off. A caller that stops waiting (a
//! dropped HTTP request, for instance) cannot leave the snapshot behind the
//! repository.

use crate::error::{StoreError, StoreResult};
use crate::notify::{self, MutationEvent, MutationKind, SnapshotSink};
use lexicon_storage::{StorageResult, WordRepository};
use lexicon_types::{normalize, ValidationError, WordEntry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedRwLockWriteGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Authoritative in-memory view.
#[derive(Debug, Default)]
struct Snapshot {
    entries: Arc<BTreeMap<String, String>>,
    revision: u64,
}

/// Serializes mutations over a [`WordRepository`] and serves reads.
pub struct WordStore {
    repo: Arc<dyn WordRepository>,
    snapshot: Arc<RwLock<Snapshot>>,
    notify_tx: mpsc::Sender<MutationEvent>,
    notifier: JoinHandle<()>,
}

impl WordStore {
    /// Loads the repository contents and starts the notifier with no sink.
    pub async fn open(repo: Arc<dyn WordRepository>) -> StoreResult<Self> {
        Self::open_with_sink(repo, None).await
    }

    /// Loads the repository contents and starts the notifier.
    ///
    /// The notifier task is running before this returns, so no mutation can
    /// be issued without a consumer.
    pub async fn open_with_sink(
        repo: Arc<dyn WordRepository>,
        sink: Option<Arc<dyn SnapshotSink>>,
    ) -> StoreResult<Self> {
        let loader = Arc::clone(&repo);
        let words = tokio::task::spawn_blocking(move || loader.list_words()).await??;

        let entries: BTreeMap<String, String> = words
            .into_iter()
            .map(|entry| (entry.word, entry.definition))
            .collect();
        info!(
            "Loaded {} words from {} repository",
            entries.len(),
            repo.backend_name()
        );

        let (notify_tx, notify_rx) = notify::channel();
        let notifier = tokio::spawn(notify::run_notifier(notify_rx, sink));

        Ok(Self {
            repo,
            snapshot: Arc::new(RwLock::new(Snapshot {
                entries: Arc::new(entries),
                revision: 0,
            })),
            notify_tx,
            notifier,
        })
    }

    /// Name of the backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.repo.backend_name()
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Adds a new word. Fails with `AlreadyExists` if it is already stored.
    pub async fn add(&self, word: &str, definition: &str) -> StoreResult<()> {
        let word = normalize(word).ok_or(ValidationError::EmptyWord)?.to_string();
        let definition = normalize(definition)
            .ok_or(ValidationError::EmptyDefinition)?
            .to_string();

        self.mutate(MutationKind::Added, word, move |repo, entries, word| {
            match repo.get_word(word) {
                Ok(_) => return Err(StoreError::AlreadyExists(word.to_string())),
                Err(lexicon_storage::StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
            repo.add_word(word, &definition)?;
            entries.insert(word.to_string(), definition);
            Ok(())
        })
        .await
    }

    /// Replaces the definition of a stored word. The word itself never changes.
    pub async fn edit(&self, word: &str, new_definition: &str) -> StoreResult<()> {
        let word = normalize(word).ok_or(ValidationError::EmptyWord)?.to_string();
        let definition = normalize(new_definition)
            .ok_or(ValidationError::EmptyDefinition)?
            .to_string();

        self.mutate(MutationKind::Edited, word, move |repo, entries, word| {
            let existing = repo.get_word(word)?;
            repo.update_word(&existing.word, &definition)?;
            entries.insert(existing.word, definition);
            Ok(())
        })
        .await
    }

    /// Removes a stored word.
    pub async fn remove(&self, word: &str) -> StoreResult<()> {
        let word = normalize(word)
            .ok_or_else(|| StoreError::NotFound(word.to_string()))?
            .to_string();

        self.mutate(MutationKind::Removed, word, |repo, entries, word| {
            repo.get_word(word)?;
            repo.delete_word(word)?;
            entries.remove(word);
            Ok(())
        })
        .await
    }

    /// Runs one mutation under the exclusive lock on a blocking worker.
    ///
    /// `apply` performs the repository calls and edits the snapshot copy; the
    /// copy is only published if `apply` succeeds.
    async fn mutate<F>(&self, kind: MutationKind, word: String, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&dyn WordRepository, &mut BTreeMap<String, String>, &str) -> StoreResult<()>
            + Send
            + 'static,
    {
        let guard = Arc::clone(&self.snapshot).write_owned().await;
        let repo = Arc::clone(&self.repo);
        let notify_tx = self.notify_tx.clone();

        tokio::task::spawn_blocking(move || {
            let event = Self::apply_locked(guard, repo.as_ref(), kind, word, apply)?;
            let revision = event.revision;
            // Guard is released by now; wait only for the hand-off.
            if notify_tx.blocking_send(event).is_err() {
                warn!("Notifier is gone, revision {} not announced", revision);
            }
            Ok(())
        })
        .await?
    }

    fn apply_locked<F>(
        mut guard: OwnedRwLockWriteGuard<Snapshot>,
        repo: &dyn WordRepository,
        kind: MutationKind,
        word: String,
        apply: F,
    ) -> StoreResult<MutationEvent>
    where
        F: FnOnce(&dyn WordRepository, &mut BTreeMap<String, String>, &str) -> StoreResult<()>,
    {
        let mut next = (*guard.entries).clone();
        if let Err(e) = apply(repo, &mut next, &word) {
            debug!("{} '{}' rejected: {}", kind, word, e);
            return Err(e);
        }

        guard.entries = Arc::new(next);
        guard.revision += 1;
        info!("Word {} '{}' (revision {})", kind, word, guard.revision);

        Ok(MutationEvent {
            revision: guard.revision,
            kind,
            word,
            entries: Arc::clone(&guard.entries),
        })
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Looks up a word.
    pub async fn get(&self, word: &str) -> StoreResult<WordEntry> {
        let key = word.trim();
        let snapshot = self.snapshot.read().await;
        snapshot
            .entries
            .get(key)
            .map(|definition| WordEntry::new(key, definition.as_str()))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Returns every entry, ordered by word.
    pub async fn list(&self) -> StoreResult<Vec<WordEntry>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .entries
            .iter()
            .map(|(word, definition)| WordEntry::new(word.as_str(), definition.as_str()))
            .collect())
    }

    /// Number of stored words.
    pub async fn len(&self) -> usize {
        self.snapshot.read().await.entries.len()
    }

    /// Whether the dictionary is empty.
    pub async fn is_empty(&self) -> bool {
        self.snapshot.read().await.entries.is_empty()
    }

    /// Count of successful mutations since the store was opened.
    pub async fn revision(&self) -> u64 {
        self.snapshot.read().await.revision
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Drains pending notifications, stops the notifier and closes the repository.
    pub async fn shutdown(self) -> StoreResult<()> {
        let Self {
            repo,
            notify_tx,
            notifier,
            ..
        } = self;

        drop(notify_tx);
        if let Err(e) = notifier.await {
            warn!("Notifier task ended abnormally: {}", e);
        }

        let backend = repo.backend_name();
        tokio::task::spawn_blocking(move || -> StorageResult<()> { repo.close() }).await??;
        info!("Closed {} repository", backend);
        Ok(())
    }
}
