//! Error types for playback management

use crate::types::TransportState;
use beatnest_core::{PersistenceError, ResolutionError};
use thiserror::Error;

/// Queue navigation found nothing to move to
///
/// Not a fault: the session reports it as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// Nothing left to play
    #[error("No next track")]
    NoNext,

    /// Already at the start of the context, or no bounded context
    #[error("No previous track")]
    NoPrevious,
}

/// Operation not valid in the current transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: TransportState,
        action: &'static str,
    },
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Audio backend failed to open or drive a transport
    #[error("Audio transport error: {0}")]
    Transport(String),

    /// No audio transport is attached
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The session service task has exited
    #[error("Playback service has stopped")]
    ServiceStopped,
}

impl PlaybackError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
