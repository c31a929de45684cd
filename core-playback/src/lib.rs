//! # Playback Engine Module
//!
//! Presents one playback API over interchangeable decoding backends.
//!
//! ## Overview
//!
//! This module handles:
//! - The [`PlayerEngine`] façade and its guard policy
//! - Mapping backend states onto the unified `Idle`/`Playing`/`Paused` state
//! - Draining backend notifications on the engine thread, dropping those
//!   that belong to an earlier play request
//! - Coordinating playlist advancement with the backend lifecycle
//!
//! Decoding itself happens behind [`bridge_traits::PlaybackBackend`].

pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod playlist;
pub mod state;

pub use dispatcher::NotificationDispatcher;
pub use engine::PlayerEngine;
pub use error::{PlaybackError, Result};
pub use playlist::PlaylistModel;
pub use state::{unify, StateMachine};
