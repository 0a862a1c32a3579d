//! BeatNest Core
//!
//! Platform-agnostic core types, collaborator traits and boundary errors for
//! the BeatNest playback engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `DownloadedTrack`, `AudioSource`, `DocumentName`
//! - **Collaborator Traits**: `CatalogProvider`, `MediaFetcher`, `DownloadIndex`, `DocumentStore`
//! - **Boundary Errors**: `ResolutionError`, `CatalogError`, `PersistenceError`
//!
//! Everything that talks to the outside world (catalog search, stream lookup,
//! downloads on disk, JSON documents) is reached through these traits so the
//! playback engine can be driven entirely by fakes in tests.
//!
//! # Example
//!
//! ```rust
//! use beatnest_core::Track;
//!
//! let track = Track::new("Yesterday", "wXTJBr9tt8Q", "The Beatles")
//!     .with_album("Help!")
//!     .with_duration_seconds(125);
//!
//! assert_eq!(track.duration_key(), "Yesterday - The Beatles");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod documents;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{CatalogError, PersistenceError, ResolutionError};
pub use traits::{CatalogProvider, DocumentStore, DownloadIndex, MediaFetcher};
pub use types::{AudioSource, DocumentName, DownloadedTrack, SearchFilter, Track};
