mod common;

use common::{csv_repo, sqlite_repo, FailingSink, GatedSink, RecordingSink};
use lexicon_storage::read_entries;
use lexicon_store::{CsvMirror, MutationKind, SnapshotSink, WordStore};
use lexicon_types::WordEntry;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn sink_sees_increasing_revisions_and_final_snapshot() {
    let sink = Arc::new(RecordingSink::default());
    let store = WordStore::open_with_sink(sqlite_repo(), Some(sink.clone()))
        .await
        .unwrap();

    store.add("cat", "an animal").await.unwrap();
    store.add("dog", "a pet").await.unwrap();
    store.edit("cat", "a feline").await.unwrap();
    store.remove("dog").await.unwrap();
    store.shutdown().await.unwrap();

    let revisions = sink.revisions();
    assert!(!revisions.is_empty());
    assert!(revisions.windows(2).all(|w| w[0] < w[1]), "{revisions:?}");

    let (revision, entries) = sink.last().unwrap();
    assert_eq!(revision, 4);
    assert_eq!(entries, vec![WordEntry::new("cat", "a feline")]);
}

#[tokio::test]
async fn failed_mutations_are_not_announced() {
    let sink = Arc::new(RecordingSink::default());
    let store = WordStore::open_with_sink(sqlite_repo(), Some(sink.clone()))
        .await
        .unwrap();

    store.add("cat", "an animal").await.unwrap();
    assert!(store.add("cat", "again").await.is_err());
    assert!(store.remove("ghost").await.is_err());
    store.shutdown().await.unwrap();

    assert_eq!(sink.revisions(), vec![1]);
}

#[tokio::test]
async fn failing_sink_does_not_fail_mutations() {
    let store = WordStore::open_with_sink(sqlite_repo(), Some(Arc::new(FailingSink)))
        .await
        .unwrap();

    store.add("cat", "an animal").await.unwrap();
    store.edit("cat", "a feline").await.unwrap();
    assert_eq!(store.get("cat").await.unwrap().definition, "a feline");
    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn slow_sink_still_receives_latest_state() {
    let sink = Arc::new(RecordingSink::slow(Duration::from_millis(20)));
    let store = WordStore::open_with_sink(sqlite_repo(), Some(sink.clone()))
        .await
        .unwrap();

    for i in 0..5 {
        store.add(&format!("word{i}"), "a definition").await.unwrap();
    }
    store.shutdown().await.unwrap();

    let (revision, entries) = sink.last().unwrap();
    assert_eq!(revision, 5);
    assert_eq!(entries.len(), 5);
}

#[tokio::test]
async fn csv_mirror_matches_store_after_shutdown() {
    let dir = TempDir::new().unwrap();
    let mirror_path = dir.path().join("mirror").join("snapshot.csv");
    let mirror = Arc::new(CsvMirror::new(&mirror_path));
    assert_eq!(mirror.path(), mirror_path.as_path());

    let store = WordStore::open_with_sink(sqlite_repo(), Some(mirror))
        .await
        .unwrap();
    store.add("zebra", "striped, horse-like").await.unwrap();
    store.add("apple", "a fruit").await.unwrap();
    let expected = store.list().await.unwrap();
    store.shutdown().await.unwrap();

    assert_eq!(read_entries(&mirror_path).unwrap(), expected);
    let raw = std::fs::read_to_string(&mirror_path).unwrap();
    assert_eq!(raw, "apple,a fruit\nzebra,\"striped, horse-like\"\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mirror_sharing_a_stem_with_primary_never_fails_mutations() {
    let dir = TempDir::new().unwrap();
    let primary = dir.path().join("dictionary.csv");
    let backup = dir.path().join("dictionary.bak");

    let store = WordStore::open_with_sink(
        csv_repo(&primary),
        Some(Arc::new(CsvMirror::new(&backup))),
    )
    .await
    .unwrap();

    for i in 0..300 {
        store.add(&format!("w{i:03}"), "a definition").await.unwrap();
    }
    assert_eq!(store.len().await, 300);
    store.shutdown().await.unwrap();

    let stored = read_entries(&primary).unwrap();
    assert_eq!(stored.len(), 300);
    assert_eq!(read_entries(&backup).unwrap(), stored);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mutation_waits_until_its_notification_is_accepted() {
    let sink = Arc::new(GatedSink::default());
    let store = Arc::new(
        WordStore::open_with_sink(sqlite_repo(), Some(sink.clone()))
            .await
            .unwrap(),
    );

    // The notifier takes the first event and blocks in the sink.
    store.add("alpha", "first word").await.unwrap();
    // The second event fills the single queue slot.
    store.add("bravo", "second word").await.unwrap();

    let third = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.add("charlie", "third word").await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!third.is_finished(), "third add returned before its event was queued");

    // Persisted and readable, only the hand-off is outstanding.
    assert_eq!(store.get("charlie").await.unwrap().definition, "third word");
    assert_eq!(store.revision().await, 3);

    sink.release();
    tokio::time::timeout(Duration::from_secs(5), third)
        .await
        .expect("third add still pending after release")
        .unwrap()
        .unwrap();

    let store = Arc::try_unwrap(store).ok().unwrap();
    store.shutdown().await.unwrap();
    assert_eq!(sink.revisions.lock().unwrap().last(), Some(&3));
}

#[tokio::test]
async fn store_without_sink_still_notifies() {
    let store = WordStore::open(sqlite_repo()).await.unwrap();
    store.add("cat", "an animal").await.unwrap();
    store.remove("cat").await.unwrap();
    store.shutdown().await.unwrap();
}

#[test]
fn mutation_kind_display() {
    assert_eq!(MutationKind::Added.to_string(), "added");
    assert_eq!(MutationKind::Edited.to_string(), "edited");
    assert_eq!(MutationKind::Removed.to_string(), "removed");
}

#[test]
fn csv_mirror_is_a_sink() {
    fn assert_sink<T: SnapshotSink>() {}
    assert_sink::<CsvMirror>();
}
