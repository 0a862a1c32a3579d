//! Core types for playback management

use crate::error::{PlaybackError, Result};
use beatnest_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Transport state of the playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// Nothing playing
    #[default]
    Idle,

    /// Waiting for a playable source
    Resolving,

    /// Audio is playing and the listening clock runs
    Playing,

    /// Paused mid-track
    Paused,

    /// Last resolution or transport open failed
    Error,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Error => "in error",
        };
        f.write_str(name)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the context ends
    #[default]
    Off,

    /// Loop the current track
    One,

    /// Wrap around to the start of the context
    All,
}

/// The ordered track list next/previous navigate through
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackContext {
    /// No context installed
    #[default]
    None,

    /// A named playlist
    Playlist { name: String },

    /// Results of the last catalog search
    SearchResults,

    /// The recommendation list
    Recommendations,

    /// A single track played outside any list
    AdHoc,
}

impl PlaybackContext {
    /// Whether the context is an ordered list navigation can step through
    pub fn is_bounded(&self) -> bool {
        matches!(
            self,
            Self::Playlist { .. } | Self::SearchResults | Self::Recommendations
        )
    }
}

/// Request to resolve a track, tagged with the generation that issued it
///
/// Whoever dispatches the resolution must hand the generation back to
/// `PlaybackSession::complete_resolution` along with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    /// Session generation at the time of the play request
    pub generation: u64,

    /// Track to resolve
    pub track: Track,
}

/// Read-only copy of session state for UI consumers
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionSnapshot {
    pub state: TransportState,
    pub current_track: Option<Track>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub volume: u8,
    pub muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub context: PlaybackContext,
    pub queue: Vec<Track>,
    pub recommendations: Vec<Track>,
    pub generation: u64,
    pub total_listening_seconds: f64,
    pub level: String,
}

/// Configuration for the playback session and service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Listening clock tick (default: 500 ms)
    pub tick_interval_ms: u64,

    /// Upper bound on one source resolution (default: 8 s)
    pub resolve_timeout_ms: u64,

    /// Upper bound on one catalog request (default: 5 s)
    pub catalog_timeout_ms: u64,

    /// Size of the recommendation list (default: 5)
    pub recommendation_limit: usize,

    /// Query used when history and searches give too few recommendations
    pub fallback_query: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            shuffle: false,
            repeat: RepeatMode::Off,
            tick_interval_ms: 500,
            resolve_timeout_ms: 8_000,
            catalog_timeout_ms: 5_000,
            recommendation_limit: 5,
            fallback_query: "The Beatles".to_string(),
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables are prefixed with `BEATNEST_`
    /// (e.g. `BEATNEST_TICK_INTERVAL_MS=250`) and override the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let path = path.as_ref();
        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("BEATNEST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: Self = settings
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.resolve_timeout_ms == 0 || self.catalog_timeout_ms == 0 {
            return Err(PlaybackError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        if self.volume > 100 {
            return Err(PlaybackError::Config(format!(
                "volume {} is out of range (0-100)",
                self.volume
            )));
        }

        Ok(())
    }

    /// Listening clock tick interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Source resolution timeout
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Catalog request timeout
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }
}
