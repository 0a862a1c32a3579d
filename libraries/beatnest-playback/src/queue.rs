//! Two-tier queue
//!
//! - Explicit queue: tracks the user asked to hear next, FIFO, highest priority
//! - Context: the playlist / search results / recommendations being played through
//!
//! The context list is never consumed; navigation works on indices into it.

use crate::error::{PlaybackError, Result};
use crate::types::PlaybackContext;
use beatnest_core::Track;
use std::collections::VecDeque;

/// Explicit queue plus the active context
///
/// ```text
/// Currently Playing: Track A (context index 2)
/// ─────────────────────────────
/// Explicit Queue (play next):
///   - Track X (user added)
/// ─────────────────────────────
/// Context (playlist "Mix"):
///   0 Track Q, 1 Track R, 2 Track A, 3 Track S
/// ```
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Tracks explicitly added by the user
    explicit: VecDeque<Track>,

    /// Active context
    context: PlaybackContext,

    /// Ordered tracks of the active context
    context_tracks: Vec<Track>,
}

impl Queue {
    /// Create an empty queue with no context
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Explicit queue =====

    /// Add a track to the end of the explicit queue
    ///
    /// Returns `false` (and changes nothing) if an equal track is already queued.
    pub fn add(&mut self, track: Track) -> bool {
        if self.explicit.contains(&track) {
            return false;
        }
        self.explicit.push_back(track);
        true
    }

    /// Remove a track from the explicit queue by index
    pub fn remove(&mut self, index: usize) -> Result<Track> {
        self.explicit
            .remove(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))
    }

    /// Move a track within the explicit queue
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.explicit.len();
        if from >= len {
            return Err(PlaybackError::IndexOutOfBounds(from));
        }
        if to >= len {
            return Err(PlaybackError::IndexOutOfBounds(to));
        }
        if from == to {
            return Ok(());
        }

        if let Some(track) = self.explicit.remove(from) {
            self.explicit.insert(to, track);
        }
        Ok(())
    }

    /// Clear the explicit queue (the context is kept)
    pub fn clear(&mut self) {
        self.explicit.clear();
    }

    /// Pop the front of the explicit queue
    pub fn pop_front(&mut self) -> Option<Track> {
        self.explicit.pop_front()
    }

    /// Explicit queue, front first
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.explicit.iter()
    }

    /// Whether a track is waiting in the explicit queue
    pub fn contains(&self, track: &Track) -> bool {
        self.explicit.contains(track)
    }

    /// Explicit queue length
    pub fn len(&self) -> usize {
        self.explicit.len()
    }

    /// Check if the explicit queue is empty
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }

    // ===== Context =====

    /// Install a new context, replacing the previous one
    pub fn set_context(&mut self, context: PlaybackContext, tracks: Vec<Track>) {
        self.context = context;
        self.context_tracks = tracks;
    }

    /// Active context
    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    /// Tracks of the active context
    pub fn context_tracks(&self) -> &[Track] {
        &self.context_tracks
    }

    /// Context track at `index`
    pub fn context_track(&self, index: usize) -> Option<&Track> {
        self.context_tracks.get(index)
    }

    /// Number of context tracks
    pub fn context_len(&self) -> usize {
        self.context_tracks.len()
    }

    /// Index of a track in the context list (first structural match)
    pub fn context_index_of(&self, track: &Track) -> Option<usize> {
        self.context_tracks.iter().position(|t| t == track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str) -> Track {
        Track::new(format!("Track {id}"), id, "Test Artist").with_duration_seconds(180)
    }

    #[test]
    fn explicit_queue_is_fifo() {
        let mut queue = Queue::new();
        queue.add(create_test_track("1"));
        queue.add(create_test_track("2"));

        assert_eq!(queue.pop_front().unwrap().id, "1");
        assert_eq!(queue.pop_front().unwrap().id, "2");
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn add_skips_structural_duplicates() {
        let mut queue = Queue::new();
        assert!(queue.add(create_test_track("1")));
        assert!(!queue.add(create_test_track("1")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_by_index() {
        let mut queue = Queue::new();
        queue.add(create_test_track("1"));
        queue.add(create_test_track("2"));

        assert_eq!(queue.remove(0).unwrap().id, "1");
        assert!(matches!(
            queue.remove(5),
            Err(PlaybackError::IndexOutOfBounds(5))
        ));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reorder_moves_track() {
        let mut queue = Queue::new();
        for id in ["1", "2", "3"] {
            queue.add(create_test_track(id));
        }

        queue.reorder(0, 2).unwrap();
        let ids: Vec<_> = queue.tracks().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);

        assert!(queue.reorder(0, 3).is_err());
    }

    #[test]
    fn clear_keeps_context() {
        let mut queue = Queue::new();
        queue.add(create_test_track("1"));
        queue.set_context(
            PlaybackContext::SearchResults,
            vec![create_test_track("a"), create_test_track("b")],
        );

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.context_len(), 2);
        assert_eq!(queue.context_index_of(&create_test_track("b")), Some(1));
    }
}
