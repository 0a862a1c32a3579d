//! Last catalog search results

use beatnest_core::Track;
use serde::{Deserialize, Serialize};

/// Tracks returned by the last search, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    tracks: Vec<Track>,
}

impl SearchResults {
    /// Current results
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Replace the results
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Drop all results
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Sort by ascending duration (stable)
    pub fn sort_by_duration(&mut self) {
        self.tracks.sort_by_key(|t| t.duration_seconds);
    }
}
