//! Backend-to-engine notification channel.
//!
//! Backends never call into the engine. They publish [`BackendNotification`]s
//! on a [`Notifier`], which is cheap to clone and safe to use from decoder
//! worker threads. The engine owns the matching [`NotificationReceiver`] and
//! drains it on its own thread, so handlers always run serialized with the
//! engine's direct calls.
//!
//! ```text
//! ┌──────────────┐ notify  ┌──────────────┐ try_recv ┌──────────────┐
//! │ decode thread├────────>│  unbounded   ├─────────>│ PlayerEngine │
//! └──────────────┘         │  mpsc queue  │          │ (UI thread)  │
//! ┌──────────────┐ notify  │              │          └──────────────┘
//! │   backend    ├────────>│              │
//! └──────────────┘         └──────────────┘
//! ```

use crate::playback::{BackendState, PlayGeneration, Screenshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

/// Something a backend observed and wants the engine to know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendEvent {
    /// The backend pipeline changed state.
    StateChanged(BackendState),
    /// The track list of the loaded media changed.
    TracksChanged,
    /// Playback position advanced.
    ElapsedChanged(Duration),
    /// The staged file finished loading and its metadata is available.
    FileLoaded,
    MuteChanged(bool),
    VolumeChanged(u32),
    /// A screenshot was captured (burst mode or asynchronous capture).
    ScreenshotTaken(Screenshot),
}

impl BackendEvent {
    /// Device-scoped events describe the audio output rather than a play
    /// target; they stay valid across play generations.
    pub fn is_device_scoped(&self) -> bool {
        matches!(
            self,
            BackendEvent::MuteChanged(_) | BackendEvent::VolumeChanged(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackendEvent::StateChanged(_) => "state_changed",
            BackendEvent::TracksChanged => "tracks_changed",
            BackendEvent::ElapsedChanged(_) => "elapsed_changed",
            BackendEvent::FileLoaded => "file_loaded",
            BackendEvent::MuteChanged(_) => "mute_changed",
            BackendEvent::VolumeChanged(_) => "volume_changed",
            BackendEvent::ScreenshotTaken(_) => "screenshot_taken",
        }
    }
}

/// A [`BackendEvent`] tagged with the play generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendNotification {
    pub generation: PlayGeneration,
    pub event: BackendEvent,
}

impl BackendNotification {
    pub fn new(generation: PlayGeneration, event: BackendEvent) -> Self {
        Self { generation, event }
    }
}

/// Sending half handed to a backend at construction.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<BackendNotification>,
}

impl Notifier {
    /// Queue a notification for the engine.
    ///
    /// Returns `false` when the engine has been dropped; backends should stop
    /// producing notifications at that point.
    pub fn notify(&self, generation: PlayGeneration, event: BackendEvent) -> bool {
        self.sender
            .send(BackendNotification::new(generation, event))
            .is_ok()
    }

    /// Whether the receiving engine is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Single-consumer receiving half owned by the engine.
#[derive(Debug)]
pub struct NotificationReceiver {
    receiver: mpsc::UnboundedReceiver<BackendNotification>,
}

impl NotificationReceiver {
    /// Take the next queued notification without blocking.
    pub fn try_recv(&mut self) -> Option<BackendNotification> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next notification. Returns `None` once every
    /// [`Notifier`] has been dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<BackendNotification> {
        self.receiver.recv().await
    }
}

/// Create a connected notifier/receiver pair.
pub fn notification_channel() -> (Notifier, NotificationReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Notifier { sender }, NotificationReceiver { receiver })
}
