//! Broadcast event bus implementation.

use battle_core::BattleEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::BattleId;

/// Event tagged with the battle that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEnvelope {
    pub battle: BattleId,
    pub event: BattleEvent,
}

impl BattleEnvelope {
    pub fn is_terminal(&self) -> bool {
        self.event.is_terminal()
    }
}

/// Best-effort fan-out of battle events.
///
/// Subscribers only see events published after they subscribed. A subscriber
/// that falls more than `capacity` events behind skips ahead
/// ([`broadcast::error::RecvError::Lagged`]); the battle itself never waits on
/// a slow consumer.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<BattleEnvelope>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, envelope: BattleEnvelope) {
        if self.tx.send(envelope).is_err() {
            // No subscribers right now - this is normal, not an error
            tracing::trace!("no subscribers for battle events");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
