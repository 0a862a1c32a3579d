//! Playback service
//!
//! Runs a `PlaybackSession` inside one tokio task. Callers talk to it through
//! a cloneable `SessionHandle`: commands go over an unbounded channel, state
//! comes back through a `watch` snapshot and events through a `broadcast`
//! channel.
//!
//! Resolution and recommendation lookups run in their own tasks and report
//! back on an internal channel, so every session mutation happens on the
//! service task without locks.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::persistence::{save_batch, SessionDocuments};
use crate::recommend::RecommendationSeeder;
use crate::resolver::SourceResolver;
use crate::session::PlaybackSession;
use crate::transport::AudioBackend;
use crate::types::{
    PlaybackConfig, PlaybackContext, RepeatMode, ResolveTicket, SessionSnapshot, TransportState,
};
use beatnest_core::{
    AudioSource, CatalogProvider, DocumentStore, DownloadIndex, MediaFetcher, PersistenceError,
    ResolutionError, Track,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Buffered events per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 256;

/// External collaborators the service needs
#[derive(Clone)]
pub struct Collaborators {
    /// Previously downloaded tracks
    pub downloads: Arc<dyn DownloadIndex>,

    /// Remote stream lookup
    pub fetcher: Arc<dyn MediaFetcher>,

    /// Catalog for recommendations (recommendations are disabled without one)
    pub catalog: Option<Arc<dyn CatalogProvider>>,

    /// Where session documents are persisted
    pub store: Arc<dyn DocumentStore>,
}

/// Commands accepted by the service
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Play(Track),
    PlayFromContext {
        context: PlaybackContext,
        tracks: Vec<Track>,
        index: usize,
    },
    Pause,
    Resume,
    Stop,
    Next,
    Previous,
    Seek(f64),
    SetVolume(u8),
    ToggleMute,
    SetShuffle(bool),
    SetRepeat(RepeatMode),
    Enqueue(Track),
    RemoveFromQueue(usize),
    ReorderQueue {
        from: usize,
        to: usize,
    },
    ClearQueue,
    /// Rebuild recommendations from history and the latest search
    RefreshRecommendations {
        latest_search: Option<String>,
    },
    /// Stop playback, save every document and exit
    Shutdown,
}

/// Results coming back from worker tasks
enum WorkerResult {
    Resolved {
        generation: u64,
        result: std::result::Result<AudioSource, ResolutionError>,
    },
    Recommendations(Vec<Track>),
}

/// Cloneable handle to a running playback service
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshot: watch::Receiver<SessionSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl SessionHandle {
    /// Send a raw command
    ///
    /// # Errors
    /// `ServiceStopped` if the service task has exited
    pub fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::ServiceStopped)
    }

    pub fn play(&self, track: Track) -> Result<()> {
        self.send(SessionCommand::Play(track))
    }

    pub fn play_from_context(
        &self,
        context: PlaybackContext,
        tracks: Vec<Track>,
        index: usize,
    ) -> Result<()> {
        self.send(SessionCommand::PlayFromContext {
            context,
            tracks,
            index,
        })
    }

    pub fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(SessionCommand::Resume)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(SessionCommand::Stop)
    }

    pub fn next(&self) -> Result<()> {
        self.send(SessionCommand::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(SessionCommand::Previous)
    }

    /// Seek to a fraction (0.0..=1.0) of the current track
    pub fn seek(&self, fraction: f64) -> Result<()> {
        self.send(SessionCommand::Seek(fraction))
    }

    pub fn set_volume(&self, level: u8) -> Result<()> {
        self.send(SessionCommand::SetVolume(level))
    }

    pub fn toggle_mute(&self) -> Result<()> {
        self.send(SessionCommand::ToggleMute)
    }

    pub fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.send(SessionCommand::SetShuffle(enabled))
    }

    pub fn set_repeat(&self, mode: RepeatMode) -> Result<()> {
        self.send(SessionCommand::SetRepeat(mode))
    }

    pub fn enqueue(&self, track: Track) -> Result<()> {
        self.send(SessionCommand::Enqueue(track))
    }

    pub fn remove_from_queue(&self, index: usize) -> Result<()> {
        self.send(SessionCommand::RemoveFromQueue(index))
    }

    pub fn reorder_queue(&self, from: usize, to: usize) -> Result<()> {
        self.send(SessionCommand::ReorderQueue { from, to })
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.send(SessionCommand::ClearQueue)
    }

    pub fn refresh_recommendations(&self, latest_search: Option<String>) -> Result<()> {
        self.send(SessionCommand::RefreshRecommendations { latest_search })
    }

    /// Ask the service to stop and save everything
    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every snapshot change
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }
}

/// Task owning the playback session
pub struct PlaybackService {
    session: PlaybackSession,
    resolver: SourceResolver,
    seeder: Option<RecommendationSeeder>,
    store: Arc<dyn DocumentStore>,

    commands: mpsc::UnboundedReceiver<SessionCommand>,
    results_tx: mpsc::UnboundedSender<WorkerResult>,
    results_rx: mpsc::UnboundedReceiver<WorkerResult>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    events_tx: broadcast::Sender<PlaybackEvent>,

    resolving: Option<JoinHandle<()>>,
    ticker: Interval,
}

impl PlaybackService {
    /// Load the session documents and start the service task
    ///
    /// The task exits after `Shutdown` or once every handle is dropped.
    pub async fn spawn(
        config: PlaybackConfig,
        backend: Box<dyn AudioBackend>,
        collaborators: Collaborators,
    ) -> (SessionHandle, JoinHandle<()>) {
        let Collaborators {
            downloads,
            fetcher,
            catalog,
            store,
        } = collaborators;

        let documents = SessionDocuments::load(store.as_ref()).await;
        let resolver = SourceResolver::new(downloads, fetcher, config.resolve_timeout());
        let seeder = catalog.map(|catalog| RecommendationSeeder::from_config(catalog, &config));

        let mut ticker = tokio::time::interval(config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let session = PlaybackSession::restore(config, backend, documents);

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let handle = SessionHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            events: events_tx.clone(),
        };

        let service = Self {
            session,
            resolver,
            seeder,
            store,
            commands: commands_rx,
            results_tx,
            results_rx,
            snapshot_tx,
            events_tx,
            resolving: None,
            ticker,
        };

        (handle, tokio::spawn(service.run()))
    }

    async fn run(mut self) {
        info!("Playback service started");
        // Restoring may already have repaired a document
        self.publish().await;

        loop {
            let was_playing = self.session.state() == TransportState::Playing;

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(result) = self.results_rx.recv() => self.handle_result(result),
                _ = self.ticker.tick(), if was_playing => self.handle_tick(),
            }

            if !was_playing && self.session.state() == TransportState::Playing {
                self.ticker.reset();
            }
            self.publish().await;
        }

        self.shutdown().await;
    }

    fn handle_command(&mut self, command: SessionCommand) {
        debug!(?command, "Handling command");

        match command {
            SessionCommand::Play(track) => {
                let ticket = self.session.play(track);
                self.dispatch(ticket);
            }
            SessionCommand::PlayFromContext {
                context,
                tracks,
                index,
            } => match self.session.play_from_context(context, tracks, index) {
                Ok(ticket) => self.dispatch(ticket),
                Err(e) => self.session.notify(e.to_string()),
            },
            SessionCommand::Pause => {
                if let Err(e) = self.session.pause() {
                    self.session.notify(e.to_string());
                }
            }
            SessionCommand::Resume => {
                if let Err(e) = self.session.resume() {
                    self.session.notify(e.to_string());
                }
            }
            SessionCommand::Stop => {
                self.cancel_resolution();
                self.session.stop();
            }
            SessionCommand::Next => match self.session.next() {
                Ok(ticket) => self.dispatch(ticket),
                Err(e) => {
                    self.cancel_resolution();
                    self.session.notify(e.to_string());
                }
            },
            SessionCommand::Previous => match self.session.previous() {
                Ok(ticket) => self.dispatch(ticket),
                Err(e) => self.session.notify(e.to_string()),
            },
            SessionCommand::Seek(fraction) => {
                if let Err(e) = self.session.seek(fraction) {
                    self.session.notify(e.to_string());
                }
            }
            SessionCommand::SetVolume(level) => self.session.set_volume(level),
            SessionCommand::ToggleMute => self.session.toggle_mute(),
            SessionCommand::SetShuffle(enabled) => self.session.set_shuffle(enabled),
            SessionCommand::SetRepeat(mode) => self.session.set_repeat(mode),
            SessionCommand::Enqueue(track) => {
                if !self.session.enqueue(track) {
                    self.session.notify("Track is already queued");
                }
            }
            SessionCommand::RemoveFromQueue(index) => {
                if let Err(e) = self.session.remove_from_queue(index) {
                    self.session.notify(e.to_string());
                }
            }
            SessionCommand::ReorderQueue { from, to } => {
                if let Err(e) = self.session.reorder_queue(from, to) {
                    self.session.notify(e.to_string());
                }
            }
            SessionCommand::ClearQueue => self.session.clear_queue(),
            SessionCommand::RefreshRecommendations { latest_search } => {
                self.refresh_recommendations(latest_search);
            }
            SessionCommand::Shutdown => {}
        }
    }

    fn handle_result(&mut self, result: WorkerResult) {
        match result {
            WorkerResult::Resolved { generation, result } => {
                if self.session.complete_resolution(generation, result) {
                    self.resolving = None;
                }
            }
            WorkerResult::Recommendations(tracks) => {
                info!(count = tracks.len(), "Recommendations refreshed");
                self.session.set_recommendations(tracks);
            }
        }
    }

    fn handle_tick(&mut self) {
        if let Some(ticket) = self.session.tick() {
            self.dispatch(ticket);
        }
    }

    /// Resolve a ticket in the background, superseding any earlier one
    fn dispatch(&mut self, ticket: ResolveTicket) {
        self.cancel_resolution();

        let resolver = self.resolver.clone();
        let results = self.results_tx.clone();
        self.resolving = Some(tokio::spawn(async move {
            let result = resolver.resolve(&ticket.track).await;
            let message = WorkerResult::Resolved {
                generation: ticket.generation,
                result,
            };
            if results.send(message).is_err() {
                debug!("Service gone before resolution finished");
            }
        }));
    }

    fn cancel_resolution(&mut self) {
        if let Some(task) = self.resolving.take() {
            task.abort();
        }
    }

    fn refresh_recommendations(&mut self, latest_search: Option<String>) {
        let Some(seeder) = self.seeder.clone() else {
            self.session
                .notify("Recommendations unavailable: no catalog configured");
            return;
        };

        let history = self.session.history().tracks().to_vec();
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let tracks = seeder.seed(&history, latest_search.as_deref()).await;
            if results.send(WorkerResult::Recommendations(tracks)).is_err() {
                debug!("Service gone before recommendations were ready");
            }
        });
    }

    /// Broadcast events, publish the snapshot and save changed documents
    async fn publish(&mut self) {
        for event in self.session.drain_events() {
            // No subscribers is not an error
            let _ = self.events_tx.send(event);
        }
        self.snapshot_tx.send_replace(self.session.snapshot());

        let dirty = self.session.take_dirty();
        if dirty.is_empty() {
            return;
        }

        let batch = dirty
            .into_iter()
            .filter_map(|name| {
                self.session
                    .document(name)
                    .map(|value| value.map(|value| (name, value)))
            })
            .collect();
        let failures = save_batch(self.store.as_ref(), batch).await;
        self.report_failures(failures);
    }

    fn report_failures(&self, failures: Vec<PersistenceError>) {
        for failure in failures {
            let _ = self.events_tx.send(PlaybackEvent::PersistenceFailed {
                document: failure.document(),
                message: failure.to_string(),
            });
        }
    }

    async fn shutdown(mut self) {
        self.cancel_resolution();
        self.session.stop();
        for event in self.session.drain_events() {
            let _ = self.events_tx.send(event);
        }
        self.snapshot_tx.send_replace(self.session.snapshot());

        let failures = self.session.documents().save(self.store.as_ref()).await;
        if !failures.is_empty() {
            warn!(count = failures.len(), "Some documents were not saved on shutdown");
        }
        self.report_failures(failures);
        info!("Playback service stopped");
    }
}
