//! Playlist collaborator contract.
//!
//! The playlist owns the ordered media sequence and the cursor. The engine
//! consumes it to resolve "what plays next" but leaves the ordering policy
//! entirely to the implementation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry of the play list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Absolute path of the media file.
    pub path: PathBuf,
    /// Display title.
    pub title: String,
}

impl PlaylistItem {
    /// Create an item titled after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, title }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Cursor advance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Play through once; stop at either end.
    #[default]
    Order,
    /// Wrap around at both ends.
    ListLoop,
    /// Repeat the current item.
    SingleLoop,
}

/// Ordered media sequence with a current-position cursor.
///
/// Index bounds are the caller's responsibility for [`Playlist::set_current`];
/// implementations may panic on an out-of-range index.
pub trait Playlist: Send {
    fn items(&self) -> &[PlaylistItem];

    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Index of the item at the cursor.
    fn current(&self) -> Option<usize>;

    /// Move the cursor to `index`.
    fn set_current(&mut self, index: usize);

    /// Advance the cursor and return the index that should start playing,
    /// or `None` when there is nothing to play next.
    fn play_next(&mut self) -> Option<usize>;

    /// Move the cursor back and return the index that should start playing.
    fn play_prev(&mut self) -> Option<usize>;

    /// Append a file; returns its index.
    fn append(&mut self, path: PathBuf) -> usize;

    /// Remove every item and reset the cursor.
    fn clear(&mut self);
}
