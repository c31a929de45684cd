//! Default in-memory playlist.

use bridge_traits::{PlayMode, Playlist, PlaylistItem};
use std::path::PathBuf;

/// Ordered list of media files with a cursor and a [`PlayMode`].
#[derive(Debug, Clone, Default)]
pub struct PlaylistModel {
    items: Vec<PlaylistItem>,
    current: Option<usize>,
    mode: PlayMode,
}

impl PlaylistModel {
    pub fn new(mode: PlayMode) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            mode,
        }
    }

    pub fn play_mode(&self) -> PlayMode {
        self.mode
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
    }

    fn last(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    fn next_index(&self) -> Option<usize> {
        let last = self.last()?;
        match (self.mode, self.current) {
            (_, None) => Some(0),
            (PlayMode::SingleLoop, Some(current)) => Some(current),
            (PlayMode::Order, Some(current)) if current >= last => None,
            (PlayMode::ListLoop, Some(current)) if current >= last => Some(0),
            (_, Some(current)) => Some(current + 1),
        }
    }

    fn prev_index(&self) -> Option<usize> {
        let last = self.last()?;
        match (self.mode, self.current) {
            (PlayMode::ListLoop, None) => Some(last),
            (_, None) => Some(0),
            (PlayMode::SingleLoop, Some(current)) => Some(current),
            (PlayMode::Order, Some(0)) => None,
            (PlayMode::ListLoop, Some(0)) => Some(last),
            (_, Some(current)) => Some(current - 1),
        }
    }
}

impl Playlist for PlaylistModel {
    fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    fn current(&self) -> Option<usize> {
        self.current
    }

    fn set_current(&mut self, index: usize) {
        assert!(
            index < self.items.len(),
            "playlist index {} out of range (len {})",
            index,
            self.items.len()
        );
        self.current = Some(index);
    }

    fn play_next(&mut self) -> Option<usize> {
        let index = self.next_index()?;
        self.current = Some(index);
        Some(index)
    }

    fn play_prev(&mut self) -> Option<usize> {
        let index = self.prev_index()?;
        self.current = Some(index);
        Some(index)
    }

    fn append(&mut self, path: PathBuf) -> usize {
        self.items.push(PlaylistItem::from_path(path));
        self.items.len() - 1
    }

    fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }
}
