
use beatnest_core::DocumentName;
use beatnest_storage::{Library, MemoryDocumentStore, StorageError};
use std::sync::Arc;
use test_helpers::{create_test_track, TestStore};

#[tokio::test]
async fn test_empty_directory_loads_empty_library() {
    let test = TestStore::new();
    let library = Library::load(test.store.clone()).await.unwrap();

    assert!(library.playlists().is_empty());
    assert!(library.favorites().tracks().is_empty());
    assert!(library.recent_searches().queries().is_empty());
    assert!(library.search_results().is_empty());
}

#[tokio::test]
async fn test_playlists_survive_restart() {
    let test = TestStore::new();
    let song = create_test_track("Help", "The Beatles", 140);

    {
        let mut library = Library::load(test.store.clone()).await.unwrap();
        let name = library.create_playlist("  Sixties ").await.unwrap();
        assert_eq!(name, "Sixties");
        assert!(library.add_to_playlist("Sixties", song.clone()).await.unwrap());
    }

    let library = Library::load(test.reopen()).await.unwrap();
    assert_eq!(library.playlists().get("Sixties"), Some(&[song][..]));
}

#[tokio::test]
async fn test_invalid_playlist_name_is_not_saved() {
    let test = TestStore::new();
    let mut library = Library::load(test.store.clone()).await.unwrap();

    let err = library.create_playlist("bad/name").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidPlaylistName { .. }));
    assert!(!test.store.path_of(DocumentName::Playlists).exists());
}

#[tokio::test]
async fn test_duplicate_add_does_not_write() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = Library::load(store.clone()).await.unwrap();
    let song = create_test_track("Help", "The Beatles", 140);

    library.create_playlist("Mix").await.unwrap();
    library.add_to_playlist("Mix", song.clone()).await.unwrap();
    assert_eq!(store.save_count(DocumentName::Playlists), 2);

    assert!(!library.add_to_playlist("Mix", song).await.unwrap());
    assert_eq!(store.save_count(DocumentName::Playlists), 2);
}

#[tokio::test]
async fn test_sort_and_remove_are_written_through() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = Library::load(store.clone()).await.unwrap();
    let long = create_test_track("Long", "Band", 600);
    let short = create_test_track("Short", "Band", 90);

    library.create_playlist("Mix").await.unwrap();
    library.add_to_playlist("Mix", long.clone()).await.unwrap();
    library.add_to_playlist("Mix", short.clone()).await.unwrap();
    library.sort_playlist_by_duration("Mix").await.unwrap();

    let saved = store.get(DocumentName::Playlists).unwrap();
    assert_eq!(saved["Mix"][0]["title"], "Short");

    assert!(library.remove_from_playlist("Mix", &short).await.unwrap());
    let saved = store.get(DocumentName::Playlists).unwrap();
    assert_eq!(saved["Mix"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_unknown_playlist() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = Library::load(store).await.unwrap();

    let err = library.delete_playlist("ghost").await.unwrap_err();
    assert!(matches!(err, StorageError::PlaylistNotFound(_)));
}

#[tokio::test]
async fn test_favorite_toggle_persists() {
    let test = TestStore::new();
    let song = create_test_track("Something", "The Beatles", 182);

    let mut library = Library::load(test.store.clone()).await.unwrap();
    assert!(library.toggle_favorite(&song).await.unwrap());

    let reloaded = Library::load(test.reopen()).await.unwrap();
    assert!(reloaded.favorites().contains(&song));

    assert!(!library.toggle_favorite(&song).await.unwrap());
    let reloaded = Library::load(test.reopen()).await.unwrap();
    assert!(!reloaded.favorites().contains(&song));
}

#[tokio::test]
async fn test_recent_searches_and_results() {
    let test = TestStore::new();
    let mut library = Library::load(test.store.clone()).await.unwrap();

    library.record_search("queen").await.unwrap();
    library.record_search("abba").await.unwrap();
    library
        .set_search_results(vec![
            create_test_track("B", "X", 300),
            create_test_track("A", "X", 100),
        ])
        .await
        .unwrap();
    library.sort_search_results_by_duration().await.unwrap();

    let reloaded = Library::load(test.reopen()).await.unwrap();
    assert_eq!(reloaded.recent_searches().latest(), Some("abba"));
    assert_eq!(reloaded.search_results()[0].title, "A");

    library.forget_search("abba").await.unwrap();
    library.clear_search_results().await.unwrap();
    let reloaded = Library::load(test.reopen()).await.unwrap();
    assert_eq!(reloaded.recent_searches().queries(), ["queen"]);
    assert!(reloaded.search_results().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = Library::load(store.clone()).await.unwrap();
    store.fail_saves(true);

    let err = library.create_playlist("Mix").await.unwrap_err();
    assert!(matches!(err, StorageError::Persistence(_)));

    // In-memory state stays authoritative
    assert!(library.playlists().get("Mix").is_some());
}

#[tokio::test]
async fn test_legacy_positional_documents_load() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.insert(
        DocumentName::Playlists,
        serde_json::json!({
            "Old": [["Yesterday", "wXTJBr9tt8Q", "The Beatles", "Help!", 125, ""]]
        }),
    );

    let library = Library::load(store).await.unwrap();
    let tracks = library.playlists().get("Old").unwrap();
    assert_eq!(tracks[0].title, "Yesterday");
    assert_eq!(tracks[0].duration_seconds, 125);
}
