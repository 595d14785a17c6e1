//! In-process change notifications backed by a `tokio::sync::broadcast`
//! channel.
//!
//! [`EventBus`] fans out every [`SyncEvent`] published by the store to any
//! number of views. Events describe what changed; the current state is
//! always read from a [`StoreSnapshot`](crate::StoreSnapshot).

use planboard_core::project::Project;
use planboard_core::types::ProjectId;
use tokio::sync::broadcast;

use crate::operation::Operation;

/// A change to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    LoadStarted,
    Loaded { count: usize },
    Created(Project),
    Updated(Project),
    Deleted(ProjectId),
    ConfirmRequested(ProjectId),
    ConfirmDeclined(ProjectId),
    Failed { op: Operation, message: &'static str },
    ErrorDismissed,
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`SyncEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if there are none.
    pub fn publish(&self, event: SyncEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
