//! # Player Engine
//!
//! Backend-agnostic playback façade.
//!
//! The engine owns exactly one [`PlaybackBackend`], the playlist collaborator
//! and the unified [`CoreState`]. All operations are synchronous and return
//! immediately; their effects on playback state become visible once the
//! backend reports them and the host calls [`PlayerEngine::dispatch_pending`].
//!
//! ## Guarded operations
//!
//! While the engine is `Idle` these return without touching the backend:
//! `seek_forward`, `seek_backward`, `toggle_subtitle`, `is_sub_visible`
//! (reports `false`), `pause_resume` and `load_subtitle`. Volume, mute,
//! screenshot and playlist operations are always delegated.
//!
//! ## Example
//!
//! ```ignore
//! use core_playback::PlayerEngine;
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::builder()
//!     .backend_factory(Arc::new(SoftwareFactory))
//!     .build()?;
//! let mut engine = PlayerEngine::new(&config)?;
//!
//! engine.add_play_file("/videos/a.mp4");
//! engine.play();
//!
//! // On the UI thread, whenever the host loop wakes up:
//! engine.dispatch_pending();
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use bridge_traits::{
    notification_channel, BackendEvent, BackendKind, CoreState, PlayGeneration, PlaybackBackend,
    PlayingMovieInfo, Playlist, PlaylistItem, Screenshot,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, PlaylistEvent, Receiver};
use core_runtime::logging::strip_path;
use tracing::{debug, info, trace, warn};

use crate::dispatcher::NotificationDispatcher;
use crate::error::{PlaybackError, Result};
use crate::playlist::PlaylistModel;
use crate::state::StateMachine;

static EMPTY_MOVIE_INFO: PlayingMovieInfo = PlayingMovieInfo::empty();

/// Playback façade over one interchangeable backend.
///
/// `Send` but not `Sync`: the engine lives on one thread and every
/// notification is handled there.
pub struct PlayerEngine {
    backend: Box<dyn PlaybackBackend>,
    playlist: Box<dyn Playlist>,
    machine: StateMachine,
    dispatcher: NotificationDispatcher,
    events: EventBus,
    /// `play()` reached the backend and no state report has come back yet.
    start_pending: bool,
}

impl PlayerEngine {
    /// Build an engine with the default in-memory playlist.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate, the factory cannot
    /// create a backend, or the backend is of the wrong kind.
    pub fn new(config: &PlayerConfig) -> Result<Self> {
        Self::with_playlist(config, Box::new(PlaylistModel::new(config.play_mode)))
    }

    /// Build an engine driving a caller-supplied playlist collaborator.
    pub fn with_playlist(config: &PlayerConfig, playlist: Box<dyn Playlist>) -> Result<Self> {
        config.validate()?;

        let (notifier, receiver) = notification_channel();
        let backend = config.backend_factory.create(notifier)?;
        if backend.kind() != config.backend {
            return Err(PlaybackError::BackendUnavailable(config.backend));
        }

        info!(
            backend = %config.backend,
            event_buffer_size = config.event_buffer_size,
            playlist_len = playlist.len(),
            "Player engine created"
        );

        Ok(Self {
            backend,
            playlist,
            machine: StateMachine::new(),
            dispatcher: NotificationDispatcher::new(receiver),
            events: EventBus::new(config.event_buffer_size),
            start_pending: false,
        })
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Handle every queued backend notification.
    ///
    /// Must be called on the engine's thread. Returns the number of accepted
    /// notifications; stale ones are dropped silently.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.dispatcher.next_event() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    fn handle(&mut self, event: BackendEvent) {
        let published = match event {
            BackendEvent::StateChanged(report) => {
                self.start_pending = false;
                let previous = self.machine.apply(report);
                let state = self.machine.state();
                debug!(from = %previous, to = %state, backend_state = ?report, "State changed");
                PlaybackEvent::StateChanged { state }
            }
            BackendEvent::TracksChanged => PlaybackEvent::TracksChanged,
            BackendEvent::ElapsedChanged(elapsed) => PlaybackEvent::ElapsedChanged {
                elapsed_ms: millis(elapsed),
                duration_ms: millis(self.backend.duration()),
            },
            BackendEvent::FileLoaded => PlaybackEvent::FileLoaded {
                title: self.backend.playing_movie_info().title.clone(),
            },
            BackendEvent::MuteChanged(muted) => PlaybackEvent::MuteChanged { muted },
            BackendEvent::VolumeChanged(volume) => PlaybackEvent::VolumeChanged { volume },
            BackendEvent::ScreenshotTaken(shot) => PlaybackEvent::ScreenshotTaken {
                width: shot.width,
                height: shot.height,
                size_bytes: shot.data.len(),
            },
        };
        self.emit(CoreEvent::Playback(published));
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is fine.
        self.events.emit(event).ok();
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Start playback from the playlist. Only acts when idle.
    ///
    /// A start that has not been confirmed by a backend state report yet
    /// counts as active, so repeated calls before `dispatch_pending` start
    /// the playlist once.
    pub fn play(&mut self) {
        if self.start_pending {
            trace!(generation = %self.generation(), "play ignored, start pending");
        } else if self.machine.is_idle() {
            self.next();
        } else {
            trace!(state = %self.state(), "play ignored, already active");
        }
    }

    /// Let the playlist pick the next item and start it.
    pub fn next(&mut self) {
        match self.playlist.play_next() {
            Some(index) => self.request_play(index),
            None => debug!("No next playlist item"),
        }
    }

    /// Let the playlist pick the previous item and start it.
    pub fn prev(&mut self) {
        match self.playlist.play_prev() {
            Some(index) => self.request_play(index),
            None => debug!("No previous playlist item"),
        }
    }

    /// Stage and start the playlist item at `index`.
    ///
    /// When the backend reports the staged file as not playable nothing else
    /// happens: the engine stays in its current state and does not skip.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; use
    /// [`try_request_play`](Self::try_request_play) for untrusted input.
    pub fn request_play(&mut self, index: usize) {
        let len = self.playlist.len();
        assert!(
            index < len,
            "request_play: playlist index {} out of range (len {})",
            index,
            len
        );
        self.start_item(index);
    }

    /// Checked form of [`request_play`](Self::request_play).
    pub fn try_request_play(&mut self, index: usize) -> Result<()> {
        let len = self.playlist.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfBounds { index, len });
        }
        self.start_item(index);
        Ok(())
    }

    fn start_item(&mut self, index: usize) {
        self.playlist.set_current(index);
        let path = self.playlist.items()[index].path.clone();
        let generation = self.dispatcher.advance();

        debug!(index, file = %strip_path(&path), %generation, "Play requested");
        self.backend.set_play_file(&path, generation);
        self.emit(CoreEvent::Playlist(PlaylistEvent::CurrentChanged { index }));

        if self.backend.is_playable() {
            self.backend.play();
            self.start_pending = true;
        } else {
            self.start_pending = false;
            warn!(index, file = %strip_path(&path), "Media not playable, playback stalled");
        }
    }

    /// Toggle between playing and paused. No-op when idle.
    pub fn pause_resume(&mut self) {
        if self.guarded("pause_resume") {
            return;
        }
        self.backend.pause_resume();
    }

    pub fn stop(&mut self) {
        self.start_pending = false;
        self.backend.stop();
    }

    pub fn seek_forward(&mut self, secs: u32) {
        if self.guarded("seek_forward") {
            return;
        }
        self.backend.seek_forward(secs);
    }

    pub fn seek_backward(&mut self, secs: u32) {
        if self.guarded("seek_backward") {
            return;
        }
        self.backend.seek_backward(secs);
    }

    /// Returns `true` (and traces) when `operation` must be skipped.
    fn guarded(&self, operation: &'static str) -> bool {
        let idle = self.machine.is_idle();
        if idle {
            trace!(operation, "Skipped while idle");
        }
        idle
    }

    // ========================================================================
    // Audio
    // ========================================================================

    pub fn volume(&self) -> u32 {
        self.backend.volume()
    }

    pub fn change_volume(&mut self, volume: u32) {
        self.backend.change_volume(volume);
    }

    pub fn volume_up(&mut self) {
        self.backend.volume_up();
    }

    pub fn volume_down(&mut self) {
        self.backend.volume_down();
    }

    pub fn muted(&self) -> bool {
        self.backend.muted()
    }

    pub fn toggle_mute(&mut self) {
        self.backend.toggle_mute();
    }

    // ========================================================================
    // Subtitles
    // ========================================================================

    pub fn load_subtitle(&mut self, path: impl AsRef<Path>) {
        if self.guarded("load_subtitle") {
            return;
        }
        self.backend.load_subtitle(path.as_ref());
    }

    pub fn toggle_subtitle(&mut self) {
        if self.guarded("toggle_subtitle") {
            return;
        }
        self.backend.toggle_subtitle();
    }

    /// Always `false` while idle.
    pub fn is_sub_visible(&self) -> bool {
        if self.guarded("is_sub_visible") {
            return false;
        }
        self.backend.is_sub_visible()
    }

    // ========================================================================
    // Screenshots
    // ========================================================================

    /// Capture the current frame; the null screenshot when nothing is shown.
    pub fn take_screenshot(&mut self) -> Screenshot {
        self.backend.take_screenshot()
    }

    pub fn burst_screenshot(&mut self) {
        self.backend.burst_screenshot();
    }

    pub fn stop_burst_screenshot(&mut self) {
        self.backend.stop_burst_screenshot();
    }

    // ========================================================================
    // Playlist
    // ========================================================================

    /// Append a file to the playlist and return its index.
    pub fn add_play_file(&mut self, path: impl Into<PathBuf>) -> usize {
        let path = path.into();
        let index = self.playlist.append(path.clone());
        debug!(index, file = %strip_path(&path), "Playlist item appended");
        self.emit(CoreEvent::Playlist(PlaylistEvent::ItemAppended { index, path }));
        index
    }

    /// Empty the playlist. Playback of the current file is not affected.
    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        debug!("Playlist cleared");
        self.emit(CoreEvent::Playlist(PlaylistEvent::Cleared));
    }

    pub fn playlist(&self) -> &dyn Playlist {
        self.playlist.as_ref()
    }

    /// The item at the playlist cursor.
    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.playlist
            .current()
            .and_then(|index| self.playlist.items().get(index))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> CoreState {
        self.machine.state()
    }

    pub fn paused(&self) -> bool {
        self.state() == CoreState::Paused
    }

    /// Snapshot of the loaded media; empty while idle.
    pub fn playing_movie_info(&self) -> &PlayingMovieInfo {
        if self.machine.is_idle() {
            return &EMPTY_MOVIE_INFO;
        }
        self.backend.playing_movie_info()
    }

    pub fn duration(&self) -> Duration {
        self.backend.duration()
    }

    pub fn elapsed(&self) -> Duration {
        self.backend.elapsed()
    }

    /// Generation of the most recent play request.
    pub fn generation(&self) -> PlayGeneration {
        self.dispatcher.generation()
    }

    /// Notifications dropped because they belonged to an earlier play request.
    pub fn discarded_notifications(&self) -> u64 {
        self.dispatcher.discarded()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

impl Drop for PlayerEngine {
    fn drop(&mut self) {
        debug!(backend = %self.backend.kind(), "Player engine dropped");
    }
}

impl std::fmt::Debug for PlayerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerEngine")
            .field("backend", &self.backend.kind())
            .field("state", &self.state())
            .field("generation", &self.generation())
            .field("start_pending", &self.start_pending)
            .field("playlist_len", &self.playlist.len())
            .field("events", &self.events)
            .finish()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
