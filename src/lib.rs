//! Workspace placeholder crate.
//!
//! Re-exports the workspace crates so a host application can depend on
//! `movie-core-workspace` alone instead of wiring each crate individually.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;
