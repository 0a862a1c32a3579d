//! Boundary error types
//!
//! These are the errors collaborators hand back to the engine. None of them is
//! fatal: the playback session turns them into state transitions and messages.
use crate::types::DocumentName;
use std::time::Duration;
use thiserror::Error;

/// Failure to turn a track into something playable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No local file and no remote stream could be located
    #[error("No playable source found for track {track_id}")]
    NotFound { track_id: String },

    /// The media fetch collaborator failed to reach its backend
    #[error("Network error: {0}")]
    Network(String),

    /// Resolution did not finish within the configured bound
    #[error("Resolution timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ResolutionError {
    /// Create a not found error
    pub fn not_found(track_id: impl Into<String>) -> Self {
        Self::NotFound {
            track_id: track_id.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}

/// Catalog / search provider failures
///
/// The engine treats every variant as "no results".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Provider could not be reached
    #[error("Catalog network error: {0}")]
    Network(String),

    /// Provider is not initialized or refused the request
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Provider did not answer in time
    #[error("Catalog request timed out")]
    Timeout,
}

/// Document store failures
///
/// Logged and surfaced for diagnostics, never retried. The in-memory state
/// stays authoritative for the running process.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed
    #[error("I/O failure on {document}: {source}")]
    Io {
        document: DocumentName,
        #[source]
        source: std::io::Error,
    },

    /// Document content could not be (de)serialized
    #[error("Malformed {document} document: {source}")]
    Serialization {
        document: DocumentName,
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific failure (remote store, injected test failure, ...)
    #[error("Store failure on {document}: {message}")]
    Backend {
        document: DocumentName,
        message: String,
    },
}

impl PersistenceError {
    /// Create an I/O error for a document
    pub fn io(document: DocumentName, source: std::io::Error) -> Self {
        Self::Io { document, source }
    }

    /// Create a serialization error for a document
    pub fn serialization(document: DocumentName, source: serde_json::Error) -> Self {
        Self::Serialization { document, source }
    }

    /// Create a backend error for a document
    pub fn backend(document: DocumentName, message: impl Into<String>) -> Self {
        Self::Backend {
            document,
            message: message.into(),
        }
    }

    /// Document the failure relates to
    pub fn document(&self) -> DocumentName {
        match self {
            Self::Io { document, .. }
            | Self::Serialization { document, .. }
            | Self::Backend { document, .. } => *document,
        }
    }
}
