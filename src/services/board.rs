//! Shared whiteboard room.
//!
//! Every authenticated WebSocket session publishes its drawing frames here and
//! receives frames from all other sessions. The room does not interpret payloads.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::services::auth::IdentityId;

/// One frame relayed between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEvent {
    pub session: Uuid,
    pub name: String,
    pub id: IdentityId,
    pub payload: String,
}

#[derive(Debug, Clone)]
pub struct Board {
    tx: broadcast::Sender<BoardEvent>,
}

impl Board {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event; returns how many sessions will see it.
    /// Zero receivers is not an error: the room is simply empty.
    pub fn publish(&self, event: BoardEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.tx.subscribe()
    }

    pub fn session_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
