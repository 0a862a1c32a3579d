//! Simulated audio backend
//!
//! Produces no sound. Tests and headless embedders drive it through a
//! `SimulatedControl`: finish the current track, move the position, make the
//! next open fail, and inspect what was opened and released.

use crate::error::{PlaybackError, Result};
use crate::transport::{AudioBackend, AudioTransport};
use beatnest_core::AudioSource;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct SimState {
    opened: Vec<AudioSource>,
    released: usize,
    fail_next_open: Option<String>,
    track_duration: Option<Duration>,
    active: Option<usize>,
    position: Duration,
    finished: bool,
    playing: bool,
    gain: f32,
}

type Shared = Arc<Mutex<SimState>>;

fn lock(state: &Shared) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend whose transports only record what they are told
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    state: Shared,
}

impl SimulatedBackend {
    /// Create a backend and its control handle
    pub fn new() -> (Self, SimulatedControl) {
        let backend = Self::default();
        let control = SimulatedControl {
            state: backend.state.clone(),
        };
        (backend, control)
    }

    /// Report this duration for every opened track
    #[must_use]
    pub fn with_track_duration(self, duration: Duration) -> Self {
        lock(&self.state).track_duration = Some(duration);
        self
    }
}

impl AudioBackend for SimulatedBackend {
    fn open(&mut self, source: &AudioSource) -> Result<Box<dyn AudioTransport>> {
        let mut state = lock(&self.state);
        if let Some(message) = state.fail_next_open.take() {
            return Err(PlaybackError::transport(message));
        }

        state.opened.push(source.clone());
        let id = state.opened.len();
        state.active = Some(id);
        state.position = Duration::ZERO;
        state.finished = false;
        state.playing = false;

        Ok(Box::new(SimulatedTransport {
            id,
            state: self.state.clone(),
            released: false,
        }))
    }
}

struct SimulatedTransport {
    id: usize,
    state: Shared,
    released: bool,
}

impl SimulatedTransport {
    fn is_active(&self, state: &SimState) -> bool {
        !self.released && state.active == Some(self.id)
    }
}

impl AudioTransport for SimulatedTransport {
    fn play(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if self.is_active(&state) {
            state.playing = true;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if self.is_active(&state) {
            state.playing = false;
        }
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let mut state = lock(&self.state);
        if self.is_active(&state) {
            state.position = position;
        }
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        let mut state = lock(&self.state);
        if self.is_active(&state) {
            state.gain = gain;
        }
    }

    fn position(&self) -> Duration {
        let state = lock(&self.state);
        if self.is_active(&state) {
            state.position
        } else {
            Duration::ZERO
        }
    }

    fn duration(&self) -> Option<Duration> {
        lock(&self.state).track_duration
    }

    fn is_finished(&self) -> bool {
        let state = lock(&self.state);
        self.is_active(&state) && state.finished
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut state = lock(&self.state);
        state.released += 1;
        if state.active == Some(self.id) {
            state.active = None;
            state.playing = false;
        }
    }
}

/// Handle for driving and inspecting a `SimulatedBackend`
#[derive(Debug, Clone)]
pub struct SimulatedControl {
    state: Shared,
}

impl SimulatedControl {
    /// Sources opened so far, oldest first
    pub fn opened(&self) -> Vec<AudioSource> {
        lock(&self.state).opened.clone()
    }

    /// Number of transports opened
    pub fn open_count(&self) -> usize {
        lock(&self.state).opened.len()
    }

    /// Number of `release` calls that freed a transport
    pub fn release_count(&self) -> usize {
        lock(&self.state).released
    }

    /// Make the next `open` fail with `message`
    pub fn fail_next_open(&self, message: impl Into<String>) {
        lock(&self.state).fail_next_open = Some(message.into());
    }

    /// Mark the active transport as finished
    pub fn finish_current(&self) {
        lock(&self.state).finished = true;
    }

    /// Move the active transport's position
    pub fn set_position(&self, position: Duration) {
        lock(&self.state).position = position;
    }

    /// Active transport position
    pub fn position(&self) -> Duration {
        lock(&self.state).position
    }

    /// Gain last applied to the active transport
    pub fn gain(&self) -> f32 {
        lock(&self.state).gain
    }

    /// Whether the active transport is playing
    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }
}
