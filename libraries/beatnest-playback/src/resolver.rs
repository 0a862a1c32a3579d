//! Source resolution
//!
//! Turns a track into something the audio backend can open: the downloaded
//! file when one exists, otherwise a stream URL from the media fetcher.

use beatnest_core::{AudioSource, DownloadIndex, MediaFetcher, ResolutionError, Track};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Local-first source resolver
///
/// Cheap to clone; the service hands a clone to every resolution task.
#[derive(Clone)]
pub struct SourceResolver {
    downloads: Arc<dyn DownloadIndex>,
    fetcher: Arc<dyn MediaFetcher>,
    timeout: Duration,
}

impl SourceResolver {
    pub fn new(
        downloads: Arc<dyn DownloadIndex>,
        fetcher: Arc<dyn MediaFetcher>,
        timeout: Duration,
    ) -> Self {
        Self {
            downloads,
            fetcher,
            timeout,
        }
    }

    /// Resolve a playable source for `track`
    ///
    /// A download entry whose file has disappeared is evicted from the index
    /// before falling back to the remote fetch.
    ///
    /// # Errors
    /// `Timeout` if the whole lookup exceeds the configured bound, otherwise
    /// whatever the media fetcher reports.
    pub async fn resolve(&self, track: &Track) -> Result<AudioSource, ResolutionError> {
        tokio::time::timeout(self.timeout, self.resolve_inner(track))
            .await
            .map_err(|_| ResolutionError::Timeout(self.timeout))?
    }

    async fn resolve_inner(&self, track: &Track) -> Result<AudioSource, ResolutionError> {
        if let Some(path) = self.downloads.lookup(&track.id).await {
            if file_exists(&path).await {
                debug!(track_id = %track.id, path = %path.display(), "Resolved local file");
                return Ok(AudioSource::LocalFile(path));
            }

            debug!(track_id = %track.id, path = %path.display(), "Downloaded file missing, evicting");
            if let Err(e) = self.downloads.remove(&track.id).await {
                warn!(track_id = %track.id, error = %e, "Failed to evict stale download entry");
            }
        }

        let url = self.fetcher.resolve_stream_url(&track.id).await?;
        debug!(track_id = %track.id, "Resolved remote stream");
        Ok(AudioSource::Stream(url))
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use beatnest_core::PersistenceError;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct FakeDownloads {
        path: Option<PathBuf>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DownloadIndex for FakeDownloads {
        async fn lookup(&self, _track_id: &str) -> Option<PathBuf> {
            self.path.clone()
        }

        async fn remove(&self, track_id: &str) -> Result<(), PersistenceError> {
            self.removed.lock().unwrap().push(track_id.to_string());
            Ok(())
        }
    }

    struct FakeFetcher {
        delay: Duration,
        found: bool,
    }

    #[async_trait]
    impl MediaFetcher for FakeFetcher {
        async fn resolve_stream_url(&self, track_id: &str) -> Result<Url, ResolutionError> {
            tokio::time::sleep(self.delay).await;
            if self.found {
                Ok(Url::parse(&format!("https://stream.example/{track_id}")).unwrap())
            } else {
                Err(ResolutionError::not_found(track_id))
            }
        }
    }

    fn resolver(downloads: Arc<FakeDownloads>, fetcher: FakeFetcher) -> SourceResolver {
        SourceResolver::new(downloads, Arc::new(fetcher), Duration::from_secs(8))
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher {
            delay: Duration::ZERO,
            found: true,
        }
    }

    fn track() -> Track {
        Track::new("Let It Be", "QDYfEBY9NM4", "The Beatles")
    }

    #[tokio::test]
    async fn prefers_existing_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("let-it-be.mp3");
        std::fs::write(&path, b"audio").unwrap();

        let downloads = Arc::new(FakeDownloads {
            path: Some(path.clone()),
            ..Default::default()
        });
        let source = resolver(downloads, fetcher()).resolve(&track()).await.unwrap();

        assert_eq!(source, AudioSource::LocalFile(path));
    }

    #[tokio::test]
    async fn evicts_missing_download_and_streams() {
        let downloads = Arc::new(FakeDownloads {
            path: Some(PathBuf::from("/nonexistent/beatnest/let-it-be.mp3")),
            ..Default::default()
        });
        let source = resolver(downloads.clone(), fetcher())
            .resolve(&track())
            .await
            .unwrap();

        assert!(matches!(source, AudioSource::Stream(_)));
        assert_eq!(*downloads.removed.lock().unwrap(), vec!["QDYfEBY9NM4".to_string()]);
    }

    #[tokio::test]
    async fn reports_not_found() {
        let downloads = Arc::new(FakeDownloads::default());
        let fetcher = FakeFetcher {
            delay: Duration::ZERO,
            found: false,
        };

        let err = resolver(downloads, fetcher).resolve(&track()).await.unwrap_err();
        assert_eq!(err, ResolutionError::not_found("QDYfEBY9NM4"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        let downloads = Arc::new(FakeDownloads::default());
        let fetcher = FakeFetcher {
            delay: Duration::from_secs(60),
            found: true,
        };

        let err = resolver(downloads, fetcher).resolve(&track()).await.unwrap_err();
        assert_eq!(err, ResolutionError::Timeout(Duration::from_secs(8)));
    }
}
