//! Battle state machine: round scheduling, turn execution and termination.
//!
//! [`Battle`] owns both rosters and the random source. It is driven either
//! step by step (`begin_round`, `next_turn`, `take_turn`/`execute`) or through
//! the composed [`Battle::play_round`] and [`Battle::run`] loops.
//!
//! The outcome is re-evaluated after every action. Once it is terminal the
//! state is frozen: no further round starts and no further turn is taken.

mod resolver;
mod turns;

use core::fmt;

use tracing::{debug, info, warn};

use crate::action::{Action, ActionError};
use crate::class::SetupError;
use crate::combatant::{Combatant, CombatantId, Roster, Side};
use crate::config::CombatRules;
use crate::decision::{DecisionContext, DecisionProvider, ProviderKind, ai};
use crate::error::{CombatError, ErrorSeverity};
use crate::event::{BattleEvent, NarrationSink, Participant};
use crate::rng::{PcgRng, RngSource};
use crate::view::{BattleSnapshot, BattleView};

pub use turns::{ScheduledTurn, schedule};

/// State of the battle state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    #[default]
    InProgress,
    HeroesWon,
    MonstersWon,
}

impl Outcome {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub const fn winner(&self) -> Option<Side> {
        match self {
            Self::InProgress => None,
            Self::HeroesWon => Some(Side::Heroes),
            Self::MonstersWon => Some(Side::Monsters),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "in progress",
            Self::HeroesWon => "the heroes are victorious",
            Self::MonstersWon => "the monsters are victorious",
        })
    }
}

/// Errors from the turn loop. Bad decisions never surface here; they are
/// recovered inside the turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("the battle is already over")]
    BattleOver,

    #[error("{actor} cannot take a turn")]
    ActorUnavailable { actor: CombatantId },

    #[error("{actor} has no valid default action")]
    NoDefaultAction { actor: CombatantId },

    #[error("default action failed: {0}")]
    Action(#[from] ActionError),
}

impl CombatError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleOver => ErrorSeverity::Fatal,
            Self::ActorUnavailable { .. } | Self::NoDefaultAction { .. } | Self::Action(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "BATTLE_OVER",
            Self::ActorUnavailable { .. } => "ACTOR_UNAVAILABLE",
            Self::NoDefaultAction { .. } => "NO_DEFAULT_ACTION",
            Self::Action(e) => e.error_code(),
        }
    }
}

/// Result of one executed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub actor: CombatantId,
    /// The action actually executed, after provocation redirects.
    pub action: Action,
    /// Combatants defeated by this action.
    pub defeated: Vec<CombatantId>,
    pub outcome: Outcome,
}

/// A battle between a hero roster and a monster roster.
#[derive(Clone, Debug)]
pub struct Battle<R: RngSource = PcgRng> {
    heroes: Roster,
    monsters: Roster,
    rules: CombatRules,
    rng: R,
    round: u32,
    outcome: Outcome,
    order: Vec<ScheduledTurn>,
    cursor: usize,
}

impl<R: RngSource> Battle<R> {
    /// Creates a battle from two populated rosters.
    pub fn new(heroes: Roster, monsters: Roster, rules: CombatRules, rng: R) -> Result<Self, SetupError> {
        check_roster(&heroes, Side::Heroes)?;
        check_roster(&monsters, Side::Monsters)?;

        let mut battle = Self {
            heroes,
            monsters,
            rules,
            rng,
            round: 0,
            outcome: Outcome::InProgress,
            order: Vec::new(),
            cursor: 0,
        };
        battle.outcome = battle.evaluate_outcome();
        Ok(battle)
    }

    // ===== accessors =====

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Heroes => &self.heroes,
            Side::Monsters => &self.monsters,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster(id.side).get(id)
    }

    /// Acting order of the current round.
    pub fn order(&self) -> &[ScheduledTurn] {
        &self.order
    }

    pub fn view(&self) -> BattleView<'_> {
        BattleView::new(&self.heroes, &self.monsters, self.round, self.outcome)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            heroes: self.heroes.clone(),
            monsters: self.monsters.clone(),
            round: self.round,
            outcome: self.outcome,
        }
    }

    // ===== round loop =====

    /// Starts the next round: expires modifiers and computes the acting order.
    pub fn begin_round(&mut self, sink: &mut (impl NarrationSink + ?Sized)) -> Result<u32, TurnError> {
        if self.is_over() {
            return Err(TurnError::BattleOver);
        }

        self.round += 1;
        self.expire_modifiers(sink);
        self.order = schedule(&self.heroes, &self.monsters, &self.rules, &mut self.rng);
        self.cursor = 0;

        let order: Vec<CombatantId> = self.order.iter().map(|t| t.id).collect();
        debug!(round = self.round, ?order, "round started");
        sink.emit(BattleEvent::RoundStarted {
            round: self.round,
            order,
        });
        Ok(self.round)
    }

    /// Next combatant to act this round.
    ///
    /// Aliveness is re-checked here, so combatants defeated earlier in the
    /// round are skipped. Returns `None` when the round is exhausted or the
    /// battle is over.
    pub fn next_turn(&mut self) -> Option<CombatantId> {
        while !self.is_over() && self.cursor < self.order.len() {
            let id = self.order[self.cursor].id;
            self.cursor += 1;
            if self.is_alive(id) {
                return Some(id);
            }
            debug!(%id, "skipping defeated combatant");
        }
        None
    }

    /// Default action: basic attack on the live provoker, else on the
    /// lowest-HP living opponent.
    pub fn default_action(&self, actor: CombatantId) -> Option<Action> {
        let view = self.view();
        let me = view.living(actor)?;
        ai::opponent_target(&view, me).map(Action::Attack)
    }

    /// Asks `provider` for a decision and executes it.
    ///
    /// A player provider whose choice is rejected is asked again, up to
    /// `max_decision_attempts` times. An NPC provider's rejected choice, a
    /// provider error or exhausted attempts all fall back to the default
    /// action.
    pub fn take_turn<P>(
        &mut self,
        actor: CombatantId,
        provider: &mut P,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Result<TurnReport, TurnError>
    where
        P: DecisionProvider + ?Sized,
    {
        if self.is_over() {
            return Err(TurnError::BattleOver);
        }
        if !self.is_alive(actor) {
            return Err(TurnError::ActorUnavailable { actor });
        }

        let attempts = match provider.kind() {
            ProviderKind::Player => self.rules.max_decision_attempts.max(1),
            ProviderKind::Npc => 1,
        };

        let mut rejection: Option<ActionError> = None;
        let mut reason = String::from("no valid decision");

        for attempt in 1..=attempts {
            let decision = {
                let mut ctx = DecisionContext {
                    actor,
                    view: BattleView::new(&self.heroes, &self.monsters, self.round, self.outcome),
                    rules: &self.rules,
                    rng: &mut self.rng,
                    rejection: rejection.as_ref(),
                    attempt,
                };
                provider.decide(&mut ctx)
            };

            match decision {
                Ok(action) => match self.execute(actor, action.clone(), sink) {
                    Ok(report) => return Ok(report),
                    Err(err) => {
                        warn!(%actor, %action, attempt, code = err.error_code(), "action rejected: {err}");
                        reason = err.to_string();
                        rejection = Some(err);
                    }
                },
                Err(err) => {
                    warn!(%actor, attempt, "provider failed: {err}");
                    reason = err.to_string();
                    break;
                }
            }
        }

        self.fallback(actor, reason, sink)
    }

    /// Plays one full round. Stops early when the battle ends mid-round.
    pub fn play_round(
        &mut self,
        heroes: &mut dyn DecisionProvider,
        monsters: &mut dyn DecisionProvider,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Result<Outcome, TurnError> {
        self.begin_round(sink)?;
        while let Some(actor) = self.next_turn() {
            let provider: &mut dyn DecisionProvider = match actor.side {
                Side::Heroes => &mut *heroes,
                Side::Monsters => &mut *monsters,
            };
            self.take_turn(actor, provider, sink)?;
        }
        Ok(self.outcome)
    }

    /// Plays rounds until one side is defeated.
    pub fn run(
        &mut self,
        heroes: &mut dyn DecisionProvider,
        monsters: &mut dyn DecisionProvider,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Result<Outcome, TurnError> {
        while !self.is_over() {
            self.play_round(heroes, monsters, sink)?;
        }
        Ok(self.outcome)
    }

    /// Executes the default action for `actor`, narrating why.
    ///
    /// Used when a provider fails, times out or exhausts its attempts.
    pub fn fallback(
        &mut self,
        actor: CombatantId,
        reason: impl Into<String>,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Result<TurnReport, TurnError> {
        if self.is_over() {
            return Err(TurnError::BattleOver);
        }
        let action = self
            .default_action(actor)
            .ok_or(TurnError::NoDefaultAction { actor })?;

        debug!(%actor, %action, "forcing default action");
        sink.emit(BattleEvent::FallbackAction {
            actor: self.participant(actor),
            reason: reason.into(),
        });
        Ok(self.execute(actor, action, sink)?)
    }

    // ===== internals =====

    fn expire_modifiers(&mut self, sink: &mut (impl NarrationSink + ?Sized)) {
        for combatant in self.heroes.iter_mut().chain(self.monsters.iter_mut()) {
            if !combatant.is_alive() {
                continue;
            }
            let target = Participant::new(combatant.id(), combatant.name());
            for expired in combatant.modifiers_mut().tick() {
                sink.emit(BattleEvent::ModifierExpired {
                    target: target.clone(),
                    stat: expired.stat,
                    kind: expired.kind,
                });
            }
        }
    }

    fn evaluate_outcome(&self) -> Outcome {
        if self.monsters.is_defeated() {
            Outcome::HeroesWon
        } else if self.heroes.is_defeated() {
            Outcome::MonstersWon
        } else {
            Outcome::InProgress
        }
    }

    /// Re-evaluates the outcome after an action and announces a transition.
    fn update_outcome(&mut self, sink: &mut (impl NarrationSink + ?Sized)) {
        if self.is_over() {
            return;
        }
        self.outcome = self.evaluate_outcome();
        if self.is_over() {
            info!(outcome = ?self.outcome, rounds = self.round, "battle ended");
            sink.emit(BattleEvent::BattleEnded {
                outcome: self.outcome,
                rounds: self.round,
            });
        }
    }

    pub(crate) fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Heroes => &mut self.heroes,
            Side::Monsters => &mut self.monsters,
        }
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster_mut(id.side).get_mut(id)
    }

    pub(crate) fn living(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatant(id).filter(|c| c.is_alive())
    }

    pub(crate) fn is_alive(&self, id: CombatantId) -> bool {
        self.living(id).is_some()
    }

    pub(crate) fn participant(&self, id: CombatantId) -> Participant {
        self.combatant(id)
            .map(|c| Participant::new(id, c.name()))
            .unwrap_or_else(|| Participant::new(id, id.to_string()))
    }
}

fn check_roster(roster: &Roster, side: Side) -> Result<(), SetupError> {
    if roster.side() != side {
        return Err(SetupError::MisplacedRoster {
            expected: side,
            found: roster.side(),
        });
    }
    if roster.is_empty() {
        return Err(SetupError::EmptyRoster(side));
    }
    if let Some(stray) = roster.iter().find(|c| c.class().side() != side) {
        return Err(SetupError::WrongSide {
            class: stray.class(),
            side,
        });
    }
    Ok(())
}
