//! Playback Events
//!
//! Event-based communication for UI synchronization. The session queues events
//! as it mutates state; the service drains and broadcasts them after every
//! command, so subscribers see them in the order they happened.

use crate::types::TransportState;
use beatnest_core::{DocumentName, Track};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: TransportState,
    },

    /// Current track changed (None after stop)
    TrackChanged {
        /// The new current track
        track: Option<Track>,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position update (once per listening tick)
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Explicit queue contents changed
    QueueChanged {
        /// New number of queued tracks
        length: usize,
    },

    /// Accumulated listening time crossed a level threshold
    LevelUp {
        /// Name of the level reached
        level: String,
        /// Listening total at the time of crossing
        total_seconds: f64,
    },

    /// Playback failed (resolution or audio output)
    Error {
        /// Human readable error message
        message: String,
    },

    /// A request could not be honored but nothing went wrong
    Notice {
        /// Human readable message
        message: String,
    },

    /// A document could not be written
    PersistenceFailed {
        /// Document that failed to save
        document: DocumentName,
        /// Failure description
        message: String,
    },
}

impl PlaybackEvent {
    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Create a notice event
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }
}
