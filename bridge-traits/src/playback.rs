//! Playback backend contract and supporting media types.
//!
//! These abstractions let the playback engine drive interchangeable decoding
//! backends (software decoding, hardware-accelerated decoding) through one
//! uniform capability surface. Backends are implemented by the host; the core
//! only ever holds a `Box<dyn PlaybackBackend>` selected from configuration.
//!
//! Every control method is a *request*. Its effect is observed later through
//! a [`BackendEvent`](crate::notify::BackendEvent) published on the backend's
//! [`Notifier`](crate::notify::Notifier), never through a return value.

use crate::error::{BridgeError, Result};
use crate::notify::Notifier;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Which decoding strategy a backend implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// CPU decoding and rendering.
    #[default]
    Software,
    /// Decoding offloaded to a video processing unit.
    #[serde(alias = "hardware")]
    HardwareAccelerated,
}

impl BackendKind {
    /// Every selectable backend kind, in preference order.
    pub const ALL: [BackendKind; 2] = [BackendKind::Software, BackendKind::HardwareAccelerated];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Software => "software",
            BackendKind::HardwareAccelerated => "hardware-accelerated",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "software" | "sw" => Ok(BackendKind::Software),
            "hardware" | "hardware-accelerated" | "hw" => Ok(BackendKind::HardwareAccelerated),
            other => Err(BridgeError::NotAvailable(format!(
                "unknown backend kind '{}' (expected 'software' or 'hardware-accelerated')",
                other
            ))),
        }
    }
}

/// Backend-local playback state.
///
/// Strictly narrower than [`CoreState`]: a backend only knows whether its
/// pipeline is running, paused or torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BackendState {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// Backend-independent playback state published by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoreState {
    /// No media loaded. Playback always starts from here.
    #[default]
    Idle,
    Playing,
    Paused,
}

impl fmt::Display for CoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoreState::Idle => "idle",
            CoreState::Playing => "playing",
            CoreState::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Token distinguishing successive play requests.
///
/// The engine advances the generation for every play request it dispatches
/// and hands it to the backend with [`PlaybackBackend::set_play_file`]. The
/// backend tags each notification with the generation it belongs to so late
/// notifications for a replaced play target can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PlayGeneration(u64);

impl PlayGeneration {
    /// Generation in effect before any play request was made.
    pub const INITIAL: PlayGeneration = PlayGeneration(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The generation that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PlayGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Kind of elementary stream inside a media container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

/// A single selectable track of the loaded media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Backend-assigned track identifier.
    pub id: u32,
    pub kind: TrackKind,
    /// Display title, when the container provides one.
    pub title: Option<String>,
    /// ISO-639 language code, when known.
    pub language: Option<String>,
}

impl TrackInfo {
    pub fn new(id: u32, kind: TrackKind) -> Self {
        Self {
            id,
            kind,
            title: None,
            language: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Snapshot describing the media currently loaded by a backend.
///
/// Owned by the backend and handed out by reference; it is only meaningful
/// while media is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayingMovieInfo {
    /// Display title of the media.
    pub title: String,
    /// File the backend loaded, if any.
    pub file_path: Option<PathBuf>,
    /// Total duration reported by the demuxer.
    pub duration: Duration,
    /// Tracks exposed by the container.
    pub tracks: Vec<TrackInfo>,
}

impl PlayingMovieInfo {
    /// The snapshot for "no media loaded".
    pub const fn empty() -> Self {
        Self {
            title: String::new(),
            file_path: None,
            duration: Duration::ZERO,
            tracks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.file_path.is_none() && self.title.is_empty() && self.tracks.is_empty()
    }

    /// Iterate over tracks of one kind.
    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &TrackInfo> {
        self.tracks.iter().filter(move |track| track.kind == kind)
    }
}

/// Captured video frame, encoded by the backend (typically PNG).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl Screenshot {
    pub fn new(width: u32, height: u32, data: Bytes) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// The screenshot returned when nothing could be captured.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

/// Capability contract every playback backend satisfies.
///
/// ## Threading
///
/// The engine calls these methods from its own thread only. A backend may
/// decode on worker threads, but every notification it produces must go
/// through the [`Notifier`] it was created with; the engine drains that
/// queue on its thread, which keeps delivery thread-affine.
///
/// ## Validity
///
/// Volume and mute are valid in any state. Seeking, subtitles and
/// screenshots require loaded media; a backend must treat them as no-ops (or
/// return a null value) when nothing is loaded.
pub trait PlaybackBackend: Send {
    /// Decoding strategy implemented by this backend.
    fn kind(&self) -> BackendKind;

    /// Stage a media source without starting playback. All notifications
    /// produced for this source are tagged with `generation`.
    fn set_play_file(&mut self, path: &Path, generation: PlayGeneration);

    /// Whether the staged source can be played.
    fn is_playable(&self) -> bool;

    /// Request playback of the staged source.
    fn play(&mut self);

    /// Request a toggle between playing and paused.
    fn pause_resume(&mut self);

    /// Request playback to stop and the source to be unloaded.
    fn stop(&mut self);

    fn state(&self) -> BackendState;

    fn seek_forward(&mut self, secs: u32);

    fn seek_backward(&mut self, secs: u32);

    /// Volume as a percentage.
    fn volume(&self) -> u32;

    /// Set the volume; the backend clamps to its supported range.
    fn change_volume(&mut self, volume: u32);

    fn volume_up(&mut self);

    fn volume_down(&mut self);

    fn muted(&self) -> bool;

    fn toggle_mute(&mut self);

    fn load_subtitle(&mut self, path: &Path);

    fn toggle_subtitle(&mut self);

    fn is_sub_visible(&self) -> bool;

    /// Capture the current frame. Returns [`Screenshot::null`] when no frame
    /// is available.
    fn take_screenshot(&mut self) -> Screenshot;

    /// Start capturing frames periodically; each capture is reported with a
    /// `ScreenshotTaken` notification.
    fn burst_screenshot(&mut self);

    fn stop_burst_screenshot(&mut self);

    fn playing_movie_info(&self) -> &PlayingMovieInfo;

    fn duration(&self) -> Duration;

    fn elapsed(&self) -> Duration;
}

/// Constructs backends of one kind.
///
/// Factories are registered in the player configuration; the engine asks the
/// factory matching the configured [`BackendKind`] for its single backend.
pub trait BackendFactory: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Create a backend that publishes its notifications on `notifier`.
    fn create(&self, notifier: Notifier) -> Result<Box<dyn PlaybackBackend>>;
}
