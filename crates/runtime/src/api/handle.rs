//! Façade over one running battle.
//!
//! [`BattleHandle`] hides the channel plumbing to the battle's worker and
//! offers async helpers to observe, stop or await it.
use battle_core::{BattleEvent, BattleSnapshot, Outcome};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::BattleId;
use super::errors::{Result, RuntimeError};
use crate::events::{BattleEnvelope, EventBus};
use crate::workers::Command;

/// Final state of a battle, returned by [`BattleHandle::join`].
#[derive(Clone, Debug)]
pub struct BattleSummary {
    pub id: BattleId,
    /// `InProgress` only when the battle was stopped early.
    pub outcome: Outcome,
    pub rounds: u32,
    pub snapshot: BattleSnapshot,
    /// Every event the battle emitted, in order.
    pub log: Vec<BattleEvent>,
}

/// Client-facing handle to a spawned battle.
#[derive(Debug)]
pub struct BattleHandle {
    id: BattleId,
    command_tx: mpsc::Sender<Command>,
    events: EventBus,
    task: JoinHandle<Result<BattleSummary>>,
}

impl BattleHandle {
    pub(crate) fn new(
        id: BattleId,
        command_tx: mpsc::Sender<Command>,
        events: EventBus,
        task: JoinHandle<Result<BattleSummary>>,
    ) -> Self {
        Self {
            id,
            command_tx,
            events,
            task,
        }
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    /// Subscribe to this battle's events from now on.
    ///
    /// Events emitted before the call are not replayed; subscribe on the host
    /// before spawning to see a battle from its first round, or read
    /// [`BattleSummary::log`].
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEnvelope> {
        self.events.subscribe()
    }

    /// Current state of the battle.
    ///
    /// Served between turns, so a battle waiting on a remote decision answers
    /// once that turn resolves.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Asks the worker to stop after the current turn.
    pub async fn stop(&self) -> Result<()> {
        self.command_tx
            .send(Command::Stop)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the battle to end.
    pub async fn join(self) -> Result<BattleSummary> {
        self.task.await.map_err(RuntimeError::WorkerJoin)?
    }

    /// Cancels the worker task outright. A later `join` reports
    /// [`RuntimeError::WorkerJoin`].
    pub fn abort(&self) {
        self.task.abort();
    }
}
