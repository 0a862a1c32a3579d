//! Listening history
//!
//! One entry per play attempt, oldest first. Duplicates are the point: the
//! history is a log of play events, used to rank top tracks.

use beatnest_core::Track;
use serde::{Deserialize, Serialize};

/// Append-only play history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListeningHistory {
    tracks: Vec<Track>,
}

impl ListeningHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a play attempt
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// All entries, oldest first
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&Track> {
        self.tracks.last()
    }

    /// Number of recorded plays
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if nothing was played yet
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// How many times a track was played
    pub fn play_count(&self, track: &Track) -> usize {
        self.tracks.iter().filter(|t| *t == track).count()
    }
}
