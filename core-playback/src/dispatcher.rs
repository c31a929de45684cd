//! Notification dispatcher with play-generation gate.
//!
//! The dispatcher is the engine's end of the backend notification queue. It
//! remembers which play generation is current and filters out notifications
//! that belong to an earlier play request, e.g. the `Stopped` a backend emits
//! for the file it just tore down when a new file was requested.

use bridge_traits::{BackendEvent, NotificationReceiver, PlayGeneration};
use tracing::debug;

/// Receives backend notifications and drops stale ones.
#[derive(Debug)]
pub struct NotificationDispatcher {
    receiver: NotificationReceiver,
    generation: PlayGeneration,
    discarded: u64,
}

impl NotificationDispatcher {
    pub fn new(receiver: NotificationReceiver) -> Self {
        Self {
            receiver,
            generation: PlayGeneration::INITIAL,
            discarded: 0,
        }
    }

    /// The generation notifications must carry to be accepted.
    pub fn generation(&self) -> PlayGeneration {
        self.generation
    }

    /// Start a new play generation and return it.
    pub fn advance(&mut self) -> PlayGeneration {
        self.generation = self.generation.next();
        self.generation
    }

    /// Number of notifications dropped as stale so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Next accepted event, or `None` when the queue is empty.
    ///
    /// Never blocks.
    pub fn next_event(&mut self) -> Option<BackendEvent> {
        while let Some(notification) = self.receiver.try_recv() {
            if notification.generation == self.generation
                || notification.event.is_device_scoped()
            {
                return Some(notification.event);
            }

            self.discarded += 1;
            debug!(
                event = notification.event.name(),
                stale = %notification.generation,
                current = %self.generation,
                "Discarding stale backend notification"
            );
        }
        None
    }
}
