//! # Event Bus System
//!
//! Provides the observer side of the player core using `tokio::sync::broadcast`.
//! The engine publishes typed events here after it has updated its own state,
//! and any number of UI components subscribe independently.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  emit   ┌───────────┐  subscribe  ┌──────────────┐
//! │ PlayerEngine ├────────>│ EventBus  ├────────────>│ control bar  │
//! └──────────────┘         │ (broadcast│             └──────────────┘
//!                          │  channel) │  subscribe  ┌──────────────┐
//!                          │           ├────────────>│ playlist view│
//!                          └───────────┘             └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::CoreState;
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! let bus = EventBus::new(16);
//! let mut subscriber = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::StateChanged {
//!     state: CoreState::Playing,
//! }))
//! .ok();
//!
//! let event = subscriber.try_recv().unwrap();
//! assert_eq!(event.description(), "Playback state changed");
//! ```
//!
//! ## Delivery
//!
//! Emission never blocks: the event is cloned into every subscriber's ring
//! buffer on the emitting thread, in emission order. A subscriber that falls
//! more than `capacity` events behind receives `RecvError::Lagged(n)` and then
//! continues with newer events; `RecvError::Closed` means the engine is gone.
//! Keep payloads lightweight since they are cloned per subscriber.

use bridge_traits::CoreState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError, TryRecvError};
pub use tokio::sync::broadcast::Receiver;

pub use crate::config::DEFAULT_EVENT_BUFFER_SIZE;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback state and media notifications
    Playback(PlaybackEvent),
    /// Playlist content and cursor changes
    Playlist(PlaylistEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Playlist(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::StateChanged { .. })
            | CoreEvent::Playback(PlaybackEvent::FileLoaded { .. })
            | CoreEvent::Playlist(PlaylistEvent::Cleared) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// High-frequency or low-interest events (position ticks, volume)
    Debug,
    /// Events a user would notice (state changes, file loads)
    Info,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Notifications re-published by the engine after it processed a backend
/// notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The unified state was (re)published.
    StateChanged {
        /// Unified state after the transition.
        state: CoreState,
    },
    /// Track list of the loaded media changed.
    TracksChanged,
    /// Playback position advanced.
    ElapsedChanged {
        /// Position (milliseconds).
        elapsed_ms: u64,
        /// Media duration (milliseconds).
        duration_ms: u64,
    },
    /// The staged file finished loading.
    FileLoaded {
        /// Title reported by the backend.
        title: String,
    },
    MuteChanged {
        muted: bool,
    },
    VolumeChanged {
        /// Volume percentage.
        volume: u32,
    },
    /// A frame was captured.
    ScreenshotTaken {
        width: u32,
        height: u32,
        /// Encoded image size in bytes.
        size_bytes: usize,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::StateChanged { .. } => "Playback state changed",
            PlaybackEvent::TracksChanged => "Track list changed",
            PlaybackEvent::ElapsedChanged { .. } => "Playback position changed",
            PlaybackEvent::FileLoaded { .. } => "Media file loaded",
            PlaybackEvent::MuteChanged { .. } => "Mute toggled",
            PlaybackEvent::VolumeChanged { .. } => "Volume changed",
            PlaybackEvent::ScreenshotTaken { .. } => "Screenshot taken",
        }
    }
}

// ============================================================================
// Playlist Events
// ============================================================================

/// Events related to playlist content changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaylistEvent {
    /// A file was appended.
    ItemAppended {
        /// Index of the new item.
        index: usize,
        path: PathBuf,
    },
    /// Every item was removed.
    Cleared,
    /// The cursor moved to a new item.
    CurrentChanged {
        index: usize,
    },
}

impl PlaylistEvent {
    fn description(&self) -> &str {
        match self {
            PlaylistEvent::ItemAppended { .. } => "Playlist item appended",
            PlaylistEvent::Cleared => "Playlist cleared",
            PlaylistEvent::CurrentChanged { .. } => "Current playlist item changed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0; `PlayerConfig` validation rejects that value.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future
    /// events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let playlist_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Playlist(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(n)) => return Some(Err(RecvError::Lagged(n))),
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every matching event currently queued.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
