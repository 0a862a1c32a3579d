//! Storage-specific errors

use beatnest_core::PersistenceError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Playlist name failed validation
    #[error("Invalid playlist name {name:?}: {reason}")]
    InvalidPlaylistName { name: String, reason: String },

    /// A playlist with this name already exists
    #[error("Playlist already exists: {0}")]
    PlaylistExists(String),

    /// No playlist with this name
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// The document store failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StorageError {
    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPlaylistName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
