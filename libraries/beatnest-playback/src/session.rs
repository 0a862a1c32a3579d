//! Playback session
//!
//! The single owner of playback state: transport state machine, current track,
//! queue and context, shuffle/repeat, volume, listening clock and the session
//! documents. Every mutation happens through `&mut self`; the service task is
//! the only caller in a running application.
//!
//! Source resolution is asynchronous and happens outside the session. `play`
//! and the navigation methods return a `ResolveTicket`; whoever resolves it
//! reports back through `complete_resolution` with the ticket's generation.
//! Results for an older generation are ignored.

use crate::clock::ListeningClock;
use crate::error::{NavigationError, PlaybackError, Result, StateError};
use crate::events::PlaybackEvent;
use crate::history::ListeningHistory;
use crate::ledger::DurationLedger;
use crate::level::UserLevel;
use crate::navigation::{self, NavigationModes, NextTrack};
use crate::persistence::SessionDocuments;
use crate::queue::Queue;
use crate::recommend::RecommendationCache;
use crate::shuffle::ShuffleOrder;
use crate::transport::{AudioBackend, AudioTransport};
use crate::types::{
    PlaybackConfig, PlaybackContext, RepeatMode, ResolveTicket, SessionSnapshot, TransportState,
};
use crate::volume::Volume;
use beatnest_core::{AudioSource, DocumentName, PersistenceError, ResolutionError, Track};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Playback session
pub struct PlaybackSession {
    config: PlaybackConfig,

    // Transport state machine
    state: TransportState,
    current_track: Option<Track>,
    generation: u64,

    // Navigation
    queue: Queue,
    // Context position of the current track; None for queued and ad hoc plays
    context_index: Option<usize>,
    shuffle: bool,
    shuffle_order: ShuffleOrder,
    repeat: RepeatMode,

    // Output
    volume: Volume,
    backend: Box<dyn AudioBackend>,
    transport: Option<Box<dyn AudioTransport>>,

    // Listening analytics
    clock: ListeningClock,
    history: ListeningHistory,
    ledger: DurationLedger,
    level: UserLevel,
    recommendations: RecommendationCache,

    // Documents changed since the last `take_dirty`
    dirty: BTreeSet<DocumentName>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Create a session with empty history and analytics
    pub fn new(config: PlaybackConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self::restore(config, backend, SessionDocuments::default())
    }

    /// Create a session from previously persisted documents
    ///
    /// The stored level is brought in line with the loaded ledger without
    /// emitting level-up events.
    pub fn restore(
        config: PlaybackConfig,
        backend: Box<dyn AudioBackend>,
        documents: SessionDocuments,
    ) -> Self {
        let SessionDocuments {
            history,
            ledger,
            mut level,
            recommendations,
        } = documents;

        let mut dirty = BTreeSet::new();
        let stored_level = level.name().to_string();
        level.reconcile(ledger.total_seconds());
        if level.name() != stored_level {
            dirty.insert(DocumentName::UserLevel);
        }

        Self {
            volume: Volume::new(config.volume),
            shuffle: config.shuffle,
            repeat: config.repeat,
            config,
            state: TransportState::Idle,
            current_track: None,
            generation: 0,
            queue: Queue::new(),
            context_index: None,
            shuffle_order: ShuffleOrder::new(),
            backend,
            transport: None,
            clock: ListeningClock::new(),
            history,
            ledger,
            level,
            recommendations,
            dirty,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Play a track picked directly by the user
    ///
    /// Keeps the current context when the track belongs to it, otherwise
    /// switches to an ad hoc context holding just this track.
    pub fn play(&mut self, track: Track) -> ResolveTicket {
        let index = self.queue.context_index_of(&track);
        if index.is_none() {
            self.queue
                .set_context(PlaybackContext::AdHoc, vec![track.clone()]);
            self.shuffle_order.clear();
        }
        self.count_recommended_play(&track);
        self.set_context_index(index);
        self.start(track)
    }

    /// Install a context and play the track at `index`
    ///
    /// # Errors
    /// `IndexOutOfBounds` if `index` is not in `tracks`; nothing changes.
    pub fn play_from_context(
        &mut self,
        context: PlaybackContext,
        tracks: Vec<Track>,
        index: usize,
    ) -> Result<ResolveTicket> {
        let track = tracks
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        self.queue.set_context(context, tracks);
        self.shuffle_order.clear();
        self.count_recommended_play(&track);
        self.set_context_index(Some(index));
        Ok(self.start(track))
    }

    /// Apply the outcome of a resolution
    ///
    /// Returns `false` when the result belongs to a superseded request and
    /// was ignored.
    pub fn complete_resolution(
        &mut self,
        generation: u64,
        result: std::result::Result<AudioSource, ResolutionError>,
    ) -> bool {
        if generation != self.generation || self.state != TransportState::Resolving {
            debug!(
                generation,
                current = self.generation,
                "Ignoring stale resolution result"
            );
            return false;
        }

        match result {
            Ok(source) => {
                if let Err(e) = self.attach(&source) {
                    self.fail(&e.to_string());
                }
            }
            Err(e) => self.fail(&e.to_string()),
        }
        true
    }

    /// Pause playback
    pub fn pause(&mut self) -> std::result::Result<(), StateError> {
        if self.state != TransportState::Playing {
            return Err(self.invalid("pause"));
        }

        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.pause() {
                warn!(error = %e, "Transport failed to pause");
            }
        }
        self.clock.stop();
        self.set_state(TransportState::Paused);
        Ok(())
    }

    /// Resume paused playback
    pub fn resume(&mut self) -> std::result::Result<(), StateError> {
        if self.state != TransportState::Paused {
            return Err(self.invalid("resume"));
        }

        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.play() {
                warn!(error = %e, "Transport failed to resume");
            }
        }
        self.clock.start(Instant::now());
        self.set_state(TransportState::Playing);
        Ok(())
    }

    /// Stop playback and clear the current track
    ///
    /// In-flight resolutions become stale.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.release_transport();
        self.clock.stop();
        self.shuffle_order.clear();
        self.context_index = None;

        if let Some(previous) = self.current_track.take() {
            self.pending_events.push(PlaybackEvent::TrackChanged {
                track: None,
                previous_track_id: Some(previous.id),
            });
        }
        self.set_state(TransportState::Idle);
    }

    /// Skip to the next track
    ///
    /// When there is nothing to move to the session stops.
    pub fn next(&mut self) -> std::result::Result<ResolveTicket, NavigationError> {
        let modes = NavigationModes {
            shuffle: self.shuffle,
            repeat: self.repeat,
        };

        match navigation::next(
            &mut self.queue,
            &mut self.shuffle_order,
            modes,
            self.current_track.as_ref(),
            self.context_index,
        ) {
            Ok(next) => {
                match &next {
                    NextTrack::Queued(_) => {
                        self.context_index = None;
                        self.emit_queue_changed();
                    }
                    NextTrack::Repeat(_) => {}
                    NextTrack::Context { index, .. } => self.set_context_index(Some(*index)),
                }
                Ok(self.start(next.into_track()))
            }
            Err(e) => {
                info!("Reached the end of the context, stopping");
                self.stop();
                Err(e)
            }
        }
    }

    /// Go back to the previous context item
    ///
    /// Nothing changes when there is none.
    pub fn previous(&mut self) -> std::result::Result<ResolveTicket, NavigationError> {
        let previous = navigation::previous(&self.queue, self.context_index)?;
        if let NextTrack::Context { index, .. } = &previous {
            self.set_context_index(Some(*index));
        }
        Ok(self.start(previous.into_track()))
    }

    /// The current track finished on its own
    pub fn track_ended(&mut self) -> std::result::Result<ResolveTicket, NavigationError> {
        self.next()
    }

    /// Seek to a fraction of the track (clamped to 0.0..=1.0)
    pub fn seek(&mut self, fraction: f64) -> Result<()> {
        let fallback = self
            .current_track
            .as_ref()
            .map_or(Duration::ZERO, Track::duration);
        let transport = self
            .transport
            .as_mut()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let duration = transport.duration().unwrap_or(fallback);
        transport.seek(duration.mul_f64(fraction))?;

        self.emit_position();
        Ok(())
    }

    // ===== Listening Clock =====

    /// Advance the listening clock
    ///
    /// Called on every tick interval while playing. Credits the elapsed time
    /// to the current track, reports level-ups and position, and moves on
    /// when the transport has finished. Returns the ticket for the next track
    /// in that case.
    pub fn tick(&mut self) -> Option<ResolveTicket> {
        if self.state != TransportState::Playing {
            return None;
        }

        if let (Some(delta), Some(track)) = (self.clock.tick(Instant::now()), &self.current_track) {
            self.ledger.add(&track.duration_key(), delta);
            self.dirty.insert(DocumentName::DurationLedger);

            let total_seconds = self.ledger.total_seconds();
            for level in self.level.advance(total_seconds) {
                info!(level, total_seconds, "Level up");
                self.pending_events.push(PlaybackEvent::LevelUp {
                    level: level.to_string(),
                    total_seconds,
                });
                self.dirty.insert(DocumentName::UserLevel);
            }
        }

        self.emit_position();

        let finished = self
            .transport
            .as_ref()
            .is_some_and(|transport| transport.is_finished());
        if finished {
            debug!("Track finished");
            return self.track_ended().ok();
        }
        None
    }

    // ===== Volume Control =====

    /// Set volume (0-100, clamped)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    // ===== Modes =====

    /// Enable or disable shuffle; the shuffle order starts over either way
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
        self.shuffle_order.clear();
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    // ===== Queue Management =====

    /// Add a track to the end of the explicit queue
    ///
    /// Returns `false` if an identical track is already queued.
    pub fn enqueue(&mut self, track: Track) -> bool {
        let added = self.queue.add(track);
        if added {
            self.emit_queue_changed();
        }
        added
    }

    /// Remove a track from the explicit queue
    pub fn remove_from_queue(&mut self, index: usize) -> Result<Track> {
        let track = self.queue.remove(index)?;
        self.emit_queue_changed();
        Ok(track)
    }

    /// Move a queued track from one position to another
    pub fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.queue.reorder(from, to)?;
        self.emit_queue_changed();
        Ok(())
    }

    /// Empty the explicit queue
    pub fn clear_queue(&mut self) {
        if !self.queue.is_empty() {
            self.queue.clear();
            self.emit_queue_changed();
        }
    }

    // ===== Recommendations =====

    /// Replace the recommendation list
    pub fn set_recommendations(&mut self, tracks: Vec<Track>) {
        self.recommendations.replace(tracks);
        self.dirty.insert(DocumentName::Recommendations);
    }

    // ===== State Queries =====

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Identifier of the latest play / stop request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Context position of the current track
    pub fn context_index(&self) -> Option<usize> {
        self.context_index
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn history(&self) -> &ListeningHistory {
        &self.history
    }

    pub fn ledger(&self) -> &DurationLedger {
        &self.ledger
    }

    pub fn level(&self) -> &UserLevel {
        &self.level
    }

    pub fn recommendations(&self) -> &RecommendationCache {
        &self.recommendations
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Current position (zero without a transport)
    pub fn position(&self) -> Duration {
        self.transport
            .as_ref()
            .map_or(Duration::ZERO, |transport| transport.position())
    }

    /// Track duration as reported by the transport, or the catalog duration
    pub fn duration(&self) -> Duration {
        self.transport
            .as_ref()
            .and_then(|transport| transport.duration())
            .or_else(|| self.current_track.as_ref().map(Track::duration))
            .unwrap_or_default()
    }

    /// Read-only copy of the session state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            position_ms: self.position().as_millis() as u64,
            duration_ms: self.duration().as_millis() as u64,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            context: self.queue.context().clone(),
            queue: self.queue.tracks().cloned().collect(),
            recommendations: self.recommendations.tracks().to_vec(),
            generation: self.generation,
            total_listening_seconds: self.ledger.total_seconds(),
            level: self.level.name().to_string(),
        }
    }

    // ===== Events & Persistence =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Queue a notice for subscribers
    pub fn notify(&mut self, message: impl Into<String>) {
        self.pending_events.push(PlaybackEvent::notice(message));
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    /// Take the set of documents changed since the last call
    pub fn take_dirty(&mut self) -> BTreeSet<DocumentName> {
        std::mem::take(&mut self.dirty)
    }

    /// Serialize one of the session-owned documents
    ///
    /// Returns `None` for documents the session does not own.
    pub fn document(
        &self,
        name: DocumentName,
    ) -> Option<std::result::Result<serde_json::Value, PersistenceError>> {
        let value = match name {
            DocumentName::History => serde_json::to_value(&self.history),
            DocumentName::DurationLedger => serde_json::to_value(&self.ledger),
            DocumentName::UserLevel => serde_json::to_value(&self.level),
            DocumentName::Recommendations => serde_json::to_value(&self.recommendations),
            _ => return None,
        };
        Some(value.map_err(|e| PersistenceError::serialization(name, e)))
    }

    /// Copy of every session-owned document
    pub fn documents(&self) -> SessionDocuments {
        SessionDocuments {
            history: self.history.clone(),
            ledger: self.ledger.clone(),
            level: self.level.clone(),
            recommendations: self.recommendations.clone(),
        }
    }

    // ===== Internals =====

    /// Record the context position about to play; it leaves the shuffle order
    fn set_context_index(&mut self, index: Option<usize>) {
        self.context_index = index;
        if let Some(index) = index {
            self.shuffle_order.discard(index);
        }
    }

    /// Begin playing `track` within the current context
    fn start(&mut self, track: Track) -> ResolveTicket {
        self.generation += 1;
        self.release_transport();
        self.clock.stop();

        self.history.push(track.clone());
        self.dirty.insert(DocumentName::History);

        let previous_track_id = self.current_track.take().map(|previous| previous.id);
        self.current_track = Some(track.clone());
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track: Some(track.clone()),
            previous_track_id,
        });
        self.set_state(TransportState::Resolving);

        debug!(track_id = %track.id, generation = self.generation, "Resolving track");
        ResolveTicket {
            generation: self.generation,
            track,
        }
    }

    /// Open a transport for the resolved source and start it
    fn attach(&mut self, source: &AudioSource) -> Result<()> {
        let mut transport = self.backend.open(source)?;
        transport.set_volume(self.volume.gain());
        if let Err(e) = transport.play() {
            transport.release();
            return Err(e);
        }

        info!(source = %source, "Playback started");
        self.transport = Some(transport);
        self.clock.start(Instant::now());
        self.set_state(TransportState::Playing);
        Ok(())
    }

    /// Enter the error state, keeping the current track
    fn fail(&mut self, message: &str) {
        warn!(error = message, "Playback failed");
        self.clock.stop();
        self.set_state(TransportState::Error);
        self.pending_events.push(PlaybackEvent::error(message));
    }

    fn release_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.release();
        }
    }

    fn count_recommended_play(&mut self, track: &Track) {
        if self.recommendations.record_play(track) {
            self.dirty.insert(DocumentName::Recommendations);
        }
    }

    fn apply_volume(&mut self) {
        let gain = self.volume.gain();
        if let Some(transport) = self.transport.as_mut() {
            transport.set_volume(gain);
        }
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn invalid(&self, action: &'static str) -> StateError {
        StateError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: self.position().as_millis() as u64,
            duration_ms: self.duration().as_millis() as u64,
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }
}
