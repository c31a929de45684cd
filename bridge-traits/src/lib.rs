//! # Host Bridge Traits
//!
//! Contracts between the playback core and the components it drives but does
//! not implement.
//!
//! ## Overview
//!
//! Each trait represents a capability the core requires and the host supplies:
//! decoding backends, the playlist collaborator and a log sink. The core only
//! ever talks to these through trait objects, so swapping the software
//! decoder for a hardware-accelerated one is a configuration choice rather
//! than a rebuild.
//!
//! ## Traits
//!
//! ### Playback
//! - [`PlaybackBackend`](playback::PlaybackBackend) - Decode/render capability surface
//! - [`BackendFactory`](playback::BackendFactory) - Constructs a backend of one [`BackendKind`]
//! - [`Notifier`](notify::Notifier) - Backend-to-engine notification queue
//!
//! ### Playlist
//! - [`Playlist`](playlist::Playlist) - Ordered items plus cursor advance policy
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Fallible bridge calls use [`BridgeError`](error::BridgeError). Backend
//! control methods are infallible requests: failures surface as a
//! `StateChanged(Stopped)` notification instead.
//!
//! ## Implementing a backend
//!
//! ```ignore
//! use bridge_traits::{BackendFactory, BackendKind, Notifier, PlaybackBackend};
//!
//! struct SoftwareFactory;
//!
//! impl BackendFactory for SoftwareFactory {
//!     fn kind(&self) -> BackendKind {
//!         BackendKind::Software
//!     }
//!
//!     fn create(&self, notifier: Notifier) -> bridge_traits::error::Result<Box<dyn PlaybackBackend>> {
//!         Ok(Box::new(MySoftwareDecoder::new(notifier)))
//!     }
//! }
//! ```

pub mod error;
pub mod log;
pub mod notify;
pub mod playback;
pub mod playlist;

pub use error::BridgeError;

// Re-export commonly used types
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use notify::{
    notification_channel, BackendEvent, BackendNotification, NotificationReceiver, Notifier,
};
pub use playback::{
    BackendFactory, BackendKind, BackendState, CoreState, PlayGeneration, PlaybackBackend,
    PlayingMovieInfo, Screenshot, TrackInfo, TrackKind,
};
pub use playlist::{PlayMode, Playlist, PlaylistItem};
