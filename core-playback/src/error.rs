//! # Playback Error Types
//!
//! Errors surfaced by the playback engine.
//!
//! Only engine construction and the checked play request can fail. Backend
//! runtime failures never appear here: a backend that cannot load or keep
//! playing media reports `Stopped`, which the engine maps to `Idle`.

use bridge_traits::{BackendKind, BridgeError};
use thiserror::Error;

/// Errors that can occur while building or driving the engine.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// Configuration was rejected.
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    /// The backend factory failed to produce a backend.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// The factory produced a backend of a different kind than configured.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(BackendKind),

    // ========================================================================
    // Playlist Errors
    // ========================================================================
    /// Play request for an index outside the playlist.
    #[error("Playlist index {index} out of range (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl PlaybackError {
    /// Returns `true` if the error stems from configuration or backend
    /// construction rather than a bad request.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::Runtime(_)
                | PlaybackError::Bridge(_)
                | PlaybackError::BackendUnavailable(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
