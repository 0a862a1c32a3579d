//! User library
//!
//! Owns the playlists, favorites, recent searches and search result documents
//! and writes each one back to the store as soon as it changes.

use beatnest_core::documents::{load_or_default, save_as};
use beatnest_core::{DocumentName, DocumentStore, Track};
use std::sync::Arc;

use crate::error::Result;
use crate::favorites::Favorites;
use crate::playlists::Playlists;
use crate::recent_searches::RecentSearches;
use crate::search_results::SearchResults;

/// Library documents with write-through persistence
pub struct Library {
    store: Arc<dyn DocumentStore>,
    playlists: Playlists,
    favorites: Favorites,
    recent_searches: RecentSearches,
    search_results: SearchResults,
}

impl Library {
    /// Load every library document (absent documents start empty)
    pub async fn load(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let playlists = load_or_default(store.as_ref(), DocumentName::Playlists).await?;
        let favorites = load_or_default(store.as_ref(), DocumentName::Favorites).await?;
        let recent_searches = load_or_default(store.as_ref(), DocumentName::RecentSearches).await?;
        let search_results = load_or_default(store.as_ref(), DocumentName::SearchResults).await?;

        Ok(Self {
            store,
            playlists,
            favorites,
            recent_searches,
            search_results,
        })
    }

    // ===== Playlists =====

    /// All playlists
    pub fn playlists(&self) -> &Playlists {
        &self.playlists
    }

    /// Create an empty playlist; returns the normalized name
    pub async fn create_playlist(&mut self, name: &str) -> Result<String> {
        let name = self.playlists.create(name)?;
        tracing::info!("Created playlist {}", name);
        self.save_playlists().await?;
        Ok(name)
    }

    /// Delete a playlist
    pub async fn delete_playlist(&mut self, name: &str) -> Result<()> {
        self.playlists.delete(name)?;
        tracing::info!("Deleted playlist {}", name);
        self.save_playlists().await
    }

    /// Add a track to a playlist; returns `false` if it was already there
    pub async fn add_to_playlist(&mut self, name: &str, track: Track) -> Result<bool> {
        let added = self.playlists.add_track(name, track)?;
        if added {
            self.save_playlists().await?;
        }
        Ok(added)
    }

    /// Remove a track from a playlist; returns `false` if it was not there
    pub async fn remove_from_playlist(&mut self, name: &str, track: &Track) -> Result<bool> {
        let removed = self.playlists.remove_track(name, track)?;
        if removed {
            self.save_playlists().await?;
        }
        Ok(removed)
    }

    /// Sort a playlist by duration
    pub async fn sort_playlist_by_duration(&mut self, name: &str) -> Result<()> {
        self.playlists.sort_by_duration(name)?;
        self.save_playlists().await
    }

    async fn save_playlists(&self) -> Result<()> {
        save_as(self.store.as_ref(), DocumentName::Playlists, &self.playlists).await?;
        Ok(())
    }

    // ===== Favorites =====

    /// All favorites
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Toggle a favorite; returns `true` if the track is now a favorite
    pub async fn toggle_favorite(&mut self, track: &Track) -> Result<bool> {
        let is_favorite = self.favorites.toggle(track);
        save_as(self.store.as_ref(), DocumentName::Favorites, &self.favorites).await?;
        Ok(is_favorite)
    }

    // ===== Searches =====

    /// Recent queries
    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent_searches
    }

    /// Record a search query
    pub async fn record_search(&mut self, query: &str) -> Result<()> {
        if self.recent_searches.record(query) {
            self.save_recent_searches().await?;
        }
        Ok(())
    }

    /// Forget a search query
    pub async fn forget_search(&mut self, query: &str) -> Result<()> {
        if self.recent_searches.forget(query) {
            self.save_recent_searches().await?;
        }
        Ok(())
    }

    async fn save_recent_searches(&self) -> Result<()> {
        save_as(
            self.store.as_ref(),
            DocumentName::RecentSearches,
            &self.recent_searches,
        )
        .await?;
        Ok(())
    }

    /// Last search results
    pub fn search_results(&self) -> &[Track] {
        self.search_results.tracks()
    }

    /// Replace the last search results
    pub async fn set_search_results(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.search_results.replace(tracks);
        self.save_search_results().await
    }

    /// Clear the last search results
    pub async fn clear_search_results(&mut self) -> Result<()> {
        self.search_results.clear();
        self.save_search_results().await
    }

    /// Sort the last search results by duration
    pub async fn sort_search_results_by_duration(&mut self) -> Result<()> {
        self.search_results.sort_by_duration();
        self.save_search_results().await
    }

    async fn save_search_results(&self) -> Result<()> {
        save_as(
            self.store.as_ref(),
            DocumentName::SearchResults,
            &self.search_results,
        )
        .await?;
        Ok(())
    }
}
