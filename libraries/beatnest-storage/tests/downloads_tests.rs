
use beatnest_core::{DocumentName, DocumentStore, DownloadIndex, DownloadedTrack};
use beatnest_storage::{DownloadsIndex, MemoryDocumentStore};
use std::sync::Arc;
use test_helpers::{create_test_track, TestStore};

#[tokio::test]
async fn test_record_and_lookup() {
    let test = TestStore::new();
    let index = DownloadsIndex::load(test.store.clone()).await.unwrap();
    let song = create_test_track("Let It Be", "The Beatles", 243);
    let path = test.dir.path().join("Let It Be - The Beatles.mp3");

    assert!(index
        .record(DownloadedTrack::new(song.clone(), &path))
        .await
        .unwrap());
    assert!(!index
        .record(DownloadedTrack::new(song.clone(), &path))
        .await
        .unwrap());

    assert_eq!(index.lookup(&song.id).await, Some(path.clone()));
    assert_eq!(index.lookup("missing").await, None);

    // Survives a reload
    let reloaded = DownloadsIndex::load(test.reopen()).await.unwrap();
    assert_eq!(reloaded.lookup(&song.id).await, Some(path));
}

#[tokio::test]
async fn test_remove_evicts_entry_and_saves() {
    let store = Arc::new(MemoryDocumentStore::new());
    let index = DownloadsIndex::load(store.clone()).await.unwrap();
    let song = create_test_track("Let It Be", "The Beatles", 243);

    index
        .record(DownloadedTrack::new(song.clone(), "/gone.mp3"))
        .await
        .unwrap();
    index.remove(&song.id).await.unwrap();

    assert_eq!(index.lookup(&song.id).await, None);
    assert_eq!(store.get(DocumentName::Downloads), Some(serde_json::json!([])));

    // Removing an unknown id is a no-op
    let saves = store.save_count(DocumentName::Downloads);
    index.remove("unknown").await.unwrap();
    assert_eq!(store.save_count(DocumentName::Downloads), saves);
}

#[tokio::test]
async fn test_delete_removes_file() {
    let test = TestStore::new();
    let index = DownloadsIndex::load(test.store.clone()).await.unwrap();
    let song = create_test_track("Blackbird", "The Beatles", 138);
    let path = test.dir.path().join("Blackbird - The Beatles.mp3");
    std::fs::write(&path, b"audio").unwrap();

    index
        .record(DownloadedTrack::new(song.clone(), &path))
        .await
        .unwrap();
    assert!(index.delete(&song.id).await.unwrap());

    assert!(!path.exists());
    assert!(index.list().await.is_empty());
    assert!(!index.delete(&song.id).await.unwrap());
}

#[tokio::test]
async fn test_loads_legacy_tuples() {
    let store = Arc::new(MemoryDocumentStore::new());
    store
        .save(
            DocumentName::Downloads,
            serde_json::json!([[
                "Yesterday",
                "wXTJBr9tt8Q",
                "The Beatles",
                "Help!",
                125,
                "",
                "downloads/Yesterday - The Beatles.mp3"
            ]]),
        )
        .await
        .unwrap();

    let index = DownloadsIndex::load(store).await.unwrap();
    assert_eq!(
        index.lookup("wXTJBr9tt8Q").await,
        Some("downloads/Yesterday - The Beatles.mp3".into())
    );
}
