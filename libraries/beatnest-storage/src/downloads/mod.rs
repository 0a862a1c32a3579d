//! Downloads index
//!
//! Records which tracks the download pipeline has written to disk. Backed by
//! the `downloads` document and saved after every change.

use async_trait::async_trait;
use beatnest_core::documents::{load_or_default, save_as};
use beatnest_core::{DocumentName, DocumentStore, DownloadIndex, DownloadedTrack, PersistenceError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Result;

/// `DownloadIndex` backed by a document store
pub struct DownloadsIndex {
    store: Arc<dyn DocumentStore>,
    entries: Mutex<Vec<DownloadedTrack>>,
}

impl DownloadsIndex {
    /// Load the index from the store (absent document means no downloads)
    pub async fn load(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let entries = load_or_default(store.as_ref(), DocumentName::Downloads).await?;
        Ok(Self {
            store,
            entries: Mutex::new(entries),
        })
    }

    /// All recorded downloads, oldest first
    pub async fn list(&self) -> Vec<DownloadedTrack> {
        self.entries.lock().await.clone()
    }

    /// Record a finished download
    ///
    /// Returns `false` if the track was already recorded.
    pub async fn record(&self, download: DownloadedTrack) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|d| d.track == download.track) {
            return Ok(false);
        }

        tracing::info!(
            "Recorded download of {} at {}",
            download.track.title,
            download.local_path.display()
        );
        entries.push(download);
        save_as(self.store.as_ref(), DocumentName::Downloads, &*entries).await?;
        Ok(true)
    }

    /// Delete a download: remove its file (if still present) and its entry
    ///
    /// Returns `false` if nothing was recorded for the track.
    pub async fn delete(&self, track_id: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let Some(pos) = entries.iter().position(|d| d.track.id == track_id) else {
            return Ok(false);
        };

        let removed = entries.remove(pos);
        match tokio::fs::remove_file(&removed.local_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    "Failed to delete {}: {}",
                    removed.local_path.display(),
                    e
                );
            }
        }

        save_as(self.store.as_ref(), DocumentName::Downloads, &*entries).await?;
        Ok(true)
    }
}

#[async_trait]
impl DownloadIndex for DownloadsIndex {
    async fn lookup(&self, track_id: &str) -> Option<PathBuf> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|d| d.track.id == track_id)
            .map(|d| d.local_path.clone())
    }

    async fn remove(&self, track_id: &str) -> std::result::Result<(), PersistenceError> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|d| d.track.id != track_id);
        if entries.len() == before {
            return Ok(());
        }

        tracing::debug!("Evicted download entry for {}", track_id);
        save_as(self.store.as_ref(), DocumentName::Downloads, &*entries).await
    }
}
