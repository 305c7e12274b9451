//! Battle worker that owns one authoritative [`Battle`].
//!
//! Drives the round loop, asks each side's [`ProviderSlot`] for decisions,
//! and publishes every narration event to the battle's bus and the host's
//! bus. Commands from the [`crate::BattleHandle`] are served between turns.

use std::time::Duration;

use battle_core::{
    Action, ActionError, Battle, BattleEvent, BattleSnapshot, CombatError, CombatantId,
    NarrationSink, ProviderError, ProviderKind, Side, TurnError, TurnReport,
};
use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::api::{
    ActionProvider, BattleId, BattleSummary, DecisionRequest, ProviderSlot, Result,
};
use crate::events::{BattleEnvelope, EventBus};

/// Commands that can be sent to a battle worker.
pub enum Command {
    /// Clone of the current battle state.
    Snapshot { reply: oneshot::Sender<BattleSnapshot> },
    /// Stop after the current turn.
    Stop,
}

/// Publishes events to both buses and keeps the battle log.
struct EventSink {
    id: BattleId,
    local: EventBus,
    host: EventBus,
    log: Vec<BattleEvent>,
}

impl NarrationSink for EventSink {
    fn emit(&mut self, event: BattleEvent) {
        debug!(battle = %self.id, "{event}");
        self.log.push(event.clone());

        let envelope = BattleEnvelope {
            battle: self.id,
            event,
        };
        self.local.publish(envelope.clone());
        self.host.publish(envelope);
    }
}

/// Background task that plays one battle to completion.
pub struct BattleWorker {
    id: BattleId,
    battle: Battle,
    heroes: ProviderSlot,
    monsters: ProviderSlot,
    decision_timeout: Duration,
    command_rx: mpsc::Receiver<Command>,
    sink: EventSink,
    stopped: bool,
}

impl BattleWorker {
    pub fn new(
        id: BattleId,
        battle: Battle,
        (heroes, monsters): (ProviderSlot, ProviderSlot),
        decision_timeout: Duration,
        command_rx: mpsc::Receiver<Command>,
        (local, host): (EventBus, EventBus),
    ) -> Self {
        Self {
            id,
            battle,
            heroes,
            monsters,
            decision_timeout,
            command_rx,
            sink: EventSink {
                id,
                local,
                host,
                log: Vec::new(),
            },
            stopped: false,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) -> Result<BattleSummary> {
        info!(battle = %self.id, heroes = ?self.heroes, monsters = ?self.monsters, "battle started");

        while !self.battle.is_over() && !self.serve_commands() {
            self.battle.begin_round(&mut self.sink)?;

            while let Some(actor) = self.battle.next_turn() {
                self.take_turn(actor).await?;
                if self.serve_commands() {
                    break;
                }
            }

            // Let sibling battles run between rounds.
            tokio::task::yield_now().await;
        }

        if self.stopped {
            info!(battle = %self.id, round = self.battle.round(), "battle stopped early");
        }
        Ok(self.into_summary())
    }

    async fn take_turn(&mut self, actor: CombatantId) -> Result<TurnReport> {
        let slot = match actor.side {
            Side::Heroes => &mut self.heroes,
            Side::Monsters => &mut self.monsters,
        };

        let report = match slot {
            ProviderSlot::Local(provider) => {
                self.battle.take_turn(actor, provider.as_mut(), &mut self.sink)?
            }
            ProviderSlot::Remote(provider) => {
                let provider = provider.clone();
                remote_turn(
                    &mut self.battle,
                    self.id,
                    actor,
                    provider.as_ref(),
                    self.decision_timeout,
                    &mut self.sink,
                )
                .await?
            }
        };

        debug!(battle = %self.id, %actor, action = %report.action, outcome = %report.outcome, "turn resolved");
        Ok(report)
    }

    /// Drains pending commands. Returns true once a stop was requested.
    fn serve_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(Command::Snapshot { reply }) => {
                    if reply.send(self.battle.snapshot()).is_err() {
                        debug!("Snapshot reply channel closed (caller dropped)");
                    }
                }
                Ok(Command::Stop) => self.stopped = true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.stopped
    }

    fn into_summary(self) -> BattleSummary {
        BattleSummary {
            id: self.id,
            outcome: self.battle.outcome(),
            rounds: self.battle.round(),
            snapshot: self.battle.snapshot(),
            log: self.sink.log,
        }
    }
}

/// Runs one turn whose decision comes from an async provider.
///
/// Mirrors [`Battle::take_turn`]: player providers get
/// `max_decision_attempts` tries, NPC providers one. Each request is bounded
/// by `timeout`; expiry, a provider error or running out of attempts all end
/// in the default action.
async fn remote_turn(
    battle: &mut Battle,
    id: BattleId,
    actor: CombatantId,
    provider: &dyn ActionProvider,
    timeout: Duration,
    sink: &mut EventSink,
) -> std::result::Result<TurnReport, TurnError> {
    let attempts = match provider.kind() {
        ProviderKind::Player => battle.rules().max_decision_attempts.max(1),
        ProviderKind::Npc => 1,
    };

    let mut rejection: Option<ActionError> = None;
    let mut reason = String::from("no valid decision");

    for attempt in 1..=attempts {
        let request = DecisionRequest {
            battle: id,
            actor,
            snapshot: battle.snapshot(),
            attempt,
            rejection: rejection.clone(),
        };

        let decision: std::result::Result<Action, ProviderError> =
            match tokio::time::timeout(timeout, provider.provide_action(request)).await {
                Ok(decision) => decision,
                Err(_) => Err(ProviderError::TimedOut),
            };

        match decision {
            Ok(action) => match battle.execute(actor, action.clone(), sink) {
                Ok(report) => return Ok(report),
                Err(err) => {
                    warn!(battle = %id, %actor, %action, attempt, code = err.error_code(), "action rejected: {err}");
                    reason = err.to_string();
                    rejection = Some(err);
                }
            },
            Err(err) => {
                warn!(battle = %id, %actor, attempt, "provider failed: {err}");
                reason = err.to_string();
                break;
            }
        }
    }

    battle.fallback(actor, reason, sink)
}
