//! # Player Configuration Module
//!
//! Provides configuration management for the playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `PlayerConfig` instance holding the backend strategy and the settings the
//! engine needs at construction time. It enforces fail-fast validation: the
//! factory for the selected backend kind must be registered before the
//! engine can be built, because the backend is created eagerly and cannot be
//! switched mid-session.
//!
//! ## Backend selection
//!
//! The backend kind is enumerated at startup, either programmatically or
//! from a settings document:
//!
//! ```json
//! { "backend": "hardware-accelerated", "event_buffer_size": 64, "play_mode": "list-loop" }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{PlayerConfig, PlayerSettings};
//! use std::sync::Arc;
//!
//! let settings = PlayerSettings::from_json(&std::fs::read_to_string("player.json")?)?;
//! let config = PlayerConfig::builder()
//!     .backend_factory(Arc::new(SoftwareFactory))
//!     .backend_factory(Arc::new(VpuFactory))
//!     .settings(settings)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! Building without a factory for the selected kind yields
//! [`Error::CapabilityMissing`] naming the kind and the kinds that *are*
//! available.

use crate::error::{Error, Result};
use bridge_traits::{BackendFactory, BackendKind, PlayMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Default capacity of the observer event bus.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Largest accepted event bus capacity.
pub const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Player configuration.
///
/// Use [`PlayerConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Backend strategy the engine is built with.
    pub backend: BackendKind,

    /// Factory producing the backend for [`PlayerConfig::backend`].
    pub backend_factory: Arc<dyn BackendFactory>,

    /// Backend kinds that had a factory registered.
    pub available_backends: Vec<BackendKind>,

    /// Capacity of the observer event bus per subscriber.
    pub event_buffer_size: usize,

    /// Advance policy of the default playlist.
    pub play_mode: PlayMode,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("backend", &self.backend)
            .field("backend_factory", &"BackendFactory { ... }")
            .field("available_backends", &self.available_backends)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("play_mode", &self.play_mode)
            .finish()
    }
}

/// Settings block that can be persisted or shipped with the application.
///
/// Every field has a default so partial documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    #[serde(default)]
    pub play_mode: PlayMode,
}

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            event_buffer_size: default_event_buffer_size(),
            play_mode: PlayMode::default(),
        }
    }
}

impl PlayerSettings {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl PlayerConfig {
    /// Creates a new builder for constructing a `PlayerConfig`.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The event buffer size is within `1..=MAX_EVENT_BUFFER_SIZE`
    /// - The factory produces the selected backend kind
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        if self.backend_factory.kind() != self.backend {
            return Err(Error::Config(format!(
                "Backend factory produces '{}' backends but '{}' was selected",
                self.backend_factory.kind(),
                self.backend
            )));
        }

        Ok(())
    }
}

fn backend_missing_error(kind: BackendKind, available: &[BackendKind]) -> Error {
    let available = if available.is_empty() {
        "none".to_string()
    } else {
        available
            .iter()
            .map(BackendKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    Error::CapabilityMissing {
        capability: format!("BackendFactory({})", kind),
        message: format!(
            "No factory registered for the '{}' backend (available: {}). \
             Register one with .backend_factory() or select an available backend.",
            kind, available
        ),
    }
}

/// Builder for constructing [`PlayerConfig`] instances.
#[derive(Default)]
pub struct PlayerConfigBuilder {
    backend: Option<BackendKind>,
    factories: HashMap<BackendKind, Arc<dyn BackendFactory>>,
    event_buffer_size: Option<usize>,
    play_mode: Option<PlayMode>,
}

impl PlayerConfigBuilder {
    /// Selects the backend strategy. Defaults to [`BackendKind::Software`].
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.backend = Some(kind);
        self
    }

    /// Registers a backend factory under the kind it reports.
    ///
    /// Registering a second factory for the same kind replaces the first.
    pub fn backend_factory(mut self, factory: Arc<dyn BackendFactory>) -> Self {
        self.factories.insert(factory.kind(), factory);
        self
    }

    /// Sets the observer event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the default playlist advance policy.
    pub fn play_mode(mut self, mode: PlayMode) -> Self {
        self.play_mode = Some(mode);
        self
    }

    /// Applies every field of a settings block.
    pub fn settings(mut self, settings: PlayerSettings) -> Self {
        self.backend = Some(settings.backend);
        self.event_buffer_size = Some(settings.event_buffer_size);
        self.play_mode = Some(settings.play_mode);
        self
    }

    /// Builds the final `PlayerConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if no factory matches the selected kind
    /// - [`Error::Config`] if a value is out of range
    pub fn build(self) -> Result<PlayerConfig> {
        let backend = self.backend.unwrap_or_default();

        let mut available_backends: Vec<BackendKind> = self.factories.keys().copied().collect();
        available_backends.sort_by_key(|kind| {
            BackendKind::ALL
                .iter()
                .position(|candidate| candidate == kind)
                .unwrap_or(usize::MAX)
        });

        let backend_factory = self
            .factories
            .get(&backend)
            .cloned()
            .ok_or_else(|| backend_missing_error(backend, &available_backends))?;

        let config = PlayerConfig {
            backend,
            backend_factory,
            available_backends,
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            play_mode: self.play_mode.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
