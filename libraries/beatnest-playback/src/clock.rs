//! Listening clock
//!
//! Measures playing time between ticks. Stopping clears the reference point,
//! so time spent paused is never backfilled on resume.

use std::time::Duration;
use tokio::time::Instant;

/// Tick-to-tick elapsed time sampler
#[derive(Debug, Clone, Copy, Default)]
pub struct ListeningClock {
    last_tick: Option<Instant>,
}

impl ListeningClock {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Start measuring from `now`
    pub fn start(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Stop measuring
    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    /// Whether the clock is running
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Time since the previous tick (or start)
    ///
    /// Returns `None` while stopped.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        let last = self.last_tick?;
        self.last_tick = Some(now);
        Some(now.saturating_duration_since(last))
    }
}
