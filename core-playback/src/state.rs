//! Unified state machine.
//!
//! ```text
//!            play / request_play (playable)
//!   ┌──────┐ ───────────────────────────────> ┌─────────┐
//!   │ Idle │                                  │ Playing │
//!   └──────┘ <─────────────── Stopped ──────  └─────────┘
//!      ^                                        │     ^
//!      │                           pause_resume │     │ pause_resume
//!      │                                        v     │
//!      │             Stopped                  ┌────────┐
//!      └───────────────────────────────────── │ Paused │
//!                                             └────────┘
//! ```
//!
//! Every backend report overwrites the unified state, so the unified state is
//! a function of the latest accepted report only.

use bridge_traits::{BackendState, CoreState};

/// Map a backend state onto the unified state.
pub fn unify(state: BackendState) -> CoreState {
    match state {
        BackendState::Playing => CoreState::Playing,
        BackendState::Paused => CoreState::Paused,
        BackendState::Stopped => CoreState::Idle,
    }
}

/// The unified state owned by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateMachine {
    state: CoreState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CoreState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CoreState::Idle
    }

    /// Apply a backend report. Returns the previous state.
    ///
    /// Redundant reports are accepted; the caller republishes them.
    pub fn apply(&mut self, report: BackendState) -> CoreState {
        std::mem::replace(&mut self.state, unify(report))
    }
}
