//! Audio output abstraction
//!
//! The session never decodes audio itself. An `AudioBackend` turns a resolved
//! `AudioSource` into an `AudioTransport` (a VLC player, a cpal stream, a
//! remote renderer) that the session drives.

use crate::error::Result;
use beatnest_core::AudioSource;
use std::time::Duration;

/// Opens transports for resolved sources
pub trait AudioBackend: Send {
    /// Open a transport for the source, ready to play
    ///
    /// # Errors
    /// Returns `PlaybackError::Transport` if the source cannot be opened
    fn open(&mut self, source: &AudioSource) -> Result<Box<dyn AudioTransport>>;
}

/// One opened source
///
/// The session calls `release` exactly once before dropping a transport.
pub trait AudioTransport: Send {
    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self) -> Result<()>;

    /// Seek to a position from the start of the track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Set the linear output gain (0.0 = silent, 1.0 = unity)
    fn set_volume(&mut self, gain: f32);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Total duration, when the backend knows it
    fn duration(&self) -> Option<Duration>;

    /// Whether the track has reached its end
    fn is_finished(&self) -> bool;

    /// Stop output and free backend resources
    fn release(&mut self);
}
