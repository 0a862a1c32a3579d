//! Persisted document names and catalog search filters
use serde::{Deserialize, Serialize};
use std::fmt;

/// One named JSON document in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentName {
    /// Playlist name -> ordered tracks
    Playlists,
    /// Favorite tracks
    Favorites,
    /// Listening history (one entry per play)
    History,
    /// Accumulated listening seconds per track
    DurationLedger,
    /// Highest level reached
    UserLevel,
    /// Recommended tracks and their play counts
    Recommendations,
    /// Most recent search queries
    RecentSearches,
    /// Downloaded tracks and their local paths
    Downloads,
    /// Results of the last catalog search
    SearchResults,
}

impl DocumentName {
    /// Every document, in load order
    pub const ALL: [Self; 9] = [
        Self::Playlists,
        Self::Favorites,
        Self::History,
        Self::DurationLedger,
        Self::UserLevel,
        Self::Recommendations,
        Self::RecentSearches,
        Self::Downloads,
        Self::SearchResults,
    ];

    /// Short lowercase name, used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playlists => "playlists",
            Self::Favorites => "favorites",
            Self::History => "history",
            Self::DurationLedger => "duration_ledger",
            Self::UserLevel => "user_level",
            Self::Recommendations => "recommendations",
            Self::RecentSearches => "recent_searches",
            Self::Downloads => "downloads",
            Self::SearchResults => "search_results",
        }
    }

    /// File name used by file-backed stores
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Playlists => "playlists.json",
            Self::Favorites => "favorites.json",
            Self::History => "listening_history.json",
            Self::DurationLedger => "listening_durations.json",
            Self::UserLevel => "user_level.json",
            Self::Recommendations => "recommendations.json",
            Self::RecentSearches => "recent_searches.json",
            Self::Downloads => "downloads.json",
            Self::SearchResults => "search_results.json",
        }
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    /// Songs only
    #[default]
    Songs,
    /// Music videos
    Videos,
    /// Albums
    Albums,
    /// Artists
    Artists,
}
