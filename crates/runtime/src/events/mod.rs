//! Events published by the simulation worker.
//!
//! Delivery is best-effort: a tick never waits for subscribers, and a slow
//! subscriber sees `RecvError::Lagged` rather than holding the worker back.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use hexwar_core::GenerationReport;

use crate::orchestrator::{Stage, TurnChange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The first tick populated the store.
    WorldGenerated(GenerationReport),

    /// The turn passed to another seat.
    TurnAdvanced(TurnChange),

    TickCompleted {
        tick: u64,
        turn_id: Option<u64>,
    },

    /// A stage failed; nothing after it ran and the tick will be retried.
    TickFailed {
        tick: u64,
        stage: Option<Stage>,
        error: String,
    },
}

/// Broadcast fan-out for [`GameEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: GameEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "runtime::events", "event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}
