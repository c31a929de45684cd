//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the player core:
//! - Logging and tracing infrastructure
//! - Configuration management (backend selection, event buffering)
//! - Event bus system for observers
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback engine depends on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder and the broadcast mechanism through which UI observers learn
//! about state changes.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
