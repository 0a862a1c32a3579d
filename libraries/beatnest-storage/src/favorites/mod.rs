//! Favorites document

use beatnest_core::Track;
use serde::{Deserialize, Serialize};

/// Favorite tracks, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    tracks: Vec<Track>,
}

impl Favorites {
    /// All favorites
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Check if a track is a favorite
    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.contains(track)
    }

    /// Add the track if absent, remove it if present
    ///
    /// Returns `true` if the track is a favorite afterwards.
    pub fn toggle(&mut self, track: &Track) -> bool {
        if let Some(pos) = self.tracks.iter().position(|t| t == track) {
            self.tracks.remove(pos);
            false
        } else {
            self.tracks.push(track.clone());
            true
        }
    }
}
