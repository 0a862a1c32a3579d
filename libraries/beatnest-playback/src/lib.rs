//! BeatNest - Playback Session & Queue Engine
//!
//! Platform-agnostic playback management for BeatNest.
//!
//! This crate provides:
//! - A single-owner playback session (Idle, Resolving, Playing, Paused, Error)
//! - Two-tier navigation (explicit queue + playback context)
//! - Shuffle without repeats and repeat modes (Off, One, All)
//! - Local-first source resolution with stale-result protection
//! - Listening time accounting and user levels
//! - History-based recommendations
//! - An async service that owns the session and persists its documents
//!
//! # Architecture
//!
//! `beatnest-playback` does not decode or output audio itself:
//! - Audio output goes through the `AudioBackend` / `AudioTransport` traits
//! - Catalog, stream lookup, downloads and documents are `beatnest-core` traits
//! - `SimulatedBackend` drives everything headless
//!
//! # Example: Driving a session directly
//!
//! ```rust
//! use beatnest_core::{AudioSource, Track};
//! use beatnest_playback::{PlaybackConfig, PlaybackSession, SimulatedBackend, TransportState};
//! use std::path::PathBuf;
//!
//! let (backend, _control) = SimulatedBackend::new();
//! let mut session = PlaybackSession::new(PlaybackConfig::default(), Box::new(backend));
//!
//! let ticket = session.play(Track::new("Something", "UelDrZ1aFeY", "The Beatles"));
//! assert_eq!(session.state(), TransportState::Resolving);
//!
//! // Whoever resolved the ticket reports back with its generation
//! let source = AudioSource::LocalFile(PathBuf::from("something.mp3"));
//! session.complete_resolution(ticket.generation, Ok(source));
//! assert_eq!(session.state(), TransportState::Playing);
//! ```
//!
//! # Example: Running the service
//!
//! ```rust,no_run
//! use beatnest_playback::{Collaborators, PlaybackConfig, PlaybackService, SimulatedBackend};
//!
//! # async fn run(collaborators: Collaborators) -> beatnest_playback::Result<()> {
//! let config = PlaybackConfig::load("beatnest.toml")?;
//! let (backend, _control) = SimulatedBackend::new();
//! let (handle, task) = PlaybackService::spawn(config, Box::new(backend), collaborators).await;
//!
//! let mut events = handle.subscribe();
//! handle.set_volume(60)?;
//! if let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//!
//! handle.shutdown()?;
//! task.await.ok();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod level;
pub mod navigation;
pub mod persistence;
pub mod queue;
pub mod recommend;
pub mod resolver;
pub mod service;
pub mod session;
pub mod shuffle;
pub mod simulated;
pub mod transport;
pub mod types;
pub mod volume;

// Re-exports
pub use error::{NavigationError, PlaybackError, Result, StateError};
pub use events::PlaybackEvent;
pub use history::ListeningHistory;
pub use ledger::DurationLedger;
pub use level::{level_for, UserLevel, LEVELS};
pub use persistence::SessionDocuments;
pub use queue::Queue;
pub use recommend::{top_tracks, RecommendationCache, RecommendationSeeder};
pub use resolver::SourceResolver;
pub use service::{Collaborators, PlaybackService, SessionCommand, SessionHandle};
pub use session::PlaybackSession;
pub use simulated::{SimulatedBackend, SimulatedControl};
pub use transport::{AudioBackend, AudioTransport};
pub use types::{
    PlaybackConfig, PlaybackContext, RepeatMode, ResolveTicket, SessionSnapshot, TransportState,
};
pub use volume::Volume;
