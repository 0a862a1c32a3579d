//! BeatNest Storage
//!
//! Document stores and library documents for the BeatNest playback engine.
//!
//! # Architecture
//!
//! - **Stores**: `JsonDocumentStore` (one JSON file per document) and
//!   `MemoryDocumentStore` (tests, headless use), both implementing
//!   `beatnest_core::DocumentStore`
//! - **Vertical Slicing**: each document owns its own rules (`playlists`,
//!   `favorites`, `recent_searches`, `search_results`, `downloads`)
//! - **Write-through**: `Library` and `DownloadsIndex` save a document as soon
//!   as it changes
//!
//! # Example
//!
//! ```rust,no_run
//! use beatnest_storage::{JsonDocumentStore, Library};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonDocumentStore::new("data"));
//! let mut library = Library::load(store).await?;
//!
//! library.create_playlist("Road Trip").await?;
//! library.record_search("the beatles").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod json_store;
mod library;
mod memory;

// Vertical slices
pub mod downloads;
pub mod favorites;
pub mod playlists;
pub mod recent_searches;
pub mod search_results;

pub use downloads::DownloadsIndex;
pub use error::{Result, StorageError};
pub use json_store::JsonDocumentStore;
pub use library::Library;
pub use memory::MemoryDocumentStore;
