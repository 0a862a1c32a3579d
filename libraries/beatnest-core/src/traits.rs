//! Collaborator traits
//!
//! Everything the engine needs from the outside world. Implementations must be
//! `Send + Sync`: the playback service shares them across spawned tasks.
use crate::error::{CatalogError, PersistenceError, ResolutionError};
use crate::types::{DocumentName, SearchFilter, Track};
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Catalog / search provider
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search the catalog
    ///
    /// # Arguments
    /// * `query` - Free-text query
    /// * `filter` - Result kind
    /// * `limit` - Maximum number of results
    async fn search(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Tracks the provider considers related to `track_id`
    async fn related_tracks(&self, track_id: &str) -> Result<Vec<Track>, CatalogError>;
}

/// Locates a remote stream for a catalog id
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Resolve a streamable URL for the track
    async fn resolve_stream_url(&self, track_id: &str) -> Result<Url, ResolutionError>;
}

/// Lookup of previously downloaded tracks
#[async_trait]
pub trait DownloadIndex: Send + Sync {
    /// Local path recorded for the track, if any
    ///
    /// The path is not guaranteed to still exist on disk.
    async fn lookup(&self, track_id: &str) -> Option<PathBuf>;

    /// Forget the download recorded for the track
    async fn remove(&self, track_id: &str) -> Result<(), PersistenceError>;
}

/// Key/value store of JSON documents
///
/// `load` returns `Ok(None)` for a document that was never saved.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load a document
    async fn load(&self, name: DocumentName) -> Result<Option<serde_json::Value>, PersistenceError>;

    /// Replace a document
    async fn save(&self, name: DocumentName, value: serde_json::Value)
        -> Result<(), PersistenceError>;
}
