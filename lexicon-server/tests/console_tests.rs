use std::sync::Arc;
use lexicon_server::run_console;
use lexicon_storage::{CsvWordRepository, SqliteWordRepository};
use lexicon_store::WordStore;
use lexicon_types::{EntryLimits, WordEntry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn test_store() -> WordStore {
    let repo = Arc::new(SqliteWordRepository::open_in_memory().unwrap());
    WordStore::open(repo).await.unwrap()
}

/// Feed a scripted session to the console and return everything it printed.
async fn run_script(store: &WordStore, script: &str) -> String {
    let mut output = Vec::new();
    run_console(store, EntryLimits::default(), script.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn quit_ends_session() {
    let store = test_store().await;
    let out = run_script(&store, "6\n1\n").await;

    assert!(out.contains("1) List words"));
    assert!(out.ends_with("Goodbye.\n"));
    assert!(!out.contains("The dictionary is empty."));
}

#[tokio::test]
async fn eof_ends_session() {
    let store = test_store().await;
    let out = run_script(&store, "").await;
    assert!(out.ends_with("Choice: "));
}

#[tokio::test]
async fn eof_mid_prompt_ends_session_without_change() {
    let store = test_store().await;
    run_script(&store, "2\ncat\n").await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn list_empty_dictionary() {
    let store = test_store().await;
    let out = run_script(&store, "1\n6\n").await;
    assert!(out.contains("The dictionary is empty.\n"));
}

#[tokio::test]
async fn add_then_list_and_lookup() {
    let store = test_store().await;
    let out = run_script(&store, "2\n  cat \nan animal\n1\n5\ncat\n6\n").await;

    assert!(out.contains("Added 'cat': an animal\n"));
    assert!(out.contains("Words in the dictionary:\n  cat: an animal\n"));
    assert!(out.contains("cat: an animal\n"));
    assert_eq!(store.list().await.unwrap(), vec![WordEntry::new("cat", "an animal")]);
}

#[tokio::test]
async fn add_existing_word_stops_before_definition() {
    let store = test_store().await;
    store.add("cat", "an animal").await.unwrap();

    let out = run_script(&store, "2\ncat\n6\n").await;
    assert!(out.contains("Error: word already exists: cat\n"));
    assert!(!out.contains("Definition: "));
    assert!(out.ends_with("Goodbye.\n"));
}

#[tokio::test]
async fn add_rejects_out_of_range_input() {
    let store = test_store().await;
    let out = run_script(&store, "2\nx\n2\ncat\nabc\n6\n").await;

    assert!(out.contains("word length must be between 2 and 30 characters (got 1)"));
    assert!(out.contains("definition length must be between 5 and 255 characters (got 3)"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn define_updates_definition() {
    let store = test_store().await;
    store.add("cat", "an animal").await.unwrap();

    let out = run_script(&store, "3\ncat\na small feline\n6\n").await;
    assert!(out.contains("Updated 'cat'.\n"));
    assert_eq!(store.get("cat").await.unwrap().definition, "a small feline");
}

#[tokio::test]
async fn define_missing_word_reports_not_found() {
    let store = test_store().await;
    let out = run_script(&store, "3\nghost\n6\n").await;

    assert!(out.contains("Error: word not found: ghost\n"));
    assert!(!out.contains("New definition: "));
}

#[tokio::test]
async fn remove_word() {
    let store = test_store().await;
    store.add("cat", "an animal").await.unwrap();

    let out = run_script(&store, "4\ncat\n4\ncat\n6\n").await;
    assert!(out.contains("Removed 'cat'.\n"));
    assert!(out.contains("Error: word not found: cat\n"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn unknown_option_is_reported() {
    let store = test_store().await;
    let out = run_script(&store, "9\n6\n").await;
    assert!(out.contains("Unknown option '9'. Choose 1-6.\n"));
}

#[tokio::test]
async fn console_changes_persist_to_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dictionary.csv");

    let store = WordStore::open(Arc::new(CsvWordRepository::open(&path).unwrap()))
        .await
        .unwrap();
    run_script(&store, "2\ndog\na loyal pet\n6\n").await;
    store.shutdown().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "dog,a loyal pet\n");
}
