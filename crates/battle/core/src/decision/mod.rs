//! Decision providers: the single point where the battle asks for input.
//!
//! The battle calls [`DecisionProvider::decide`] synchronously and expects
//! exactly one [`Action`] back. Player-backed providers may be asked again
//! when their choice is rejected; NPC providers fall back to the default
//! action immediately.

pub(crate) mod ai;
mod player;

use crate::action::{Action, ActionError};
use crate::combatant::{Combatant, CombatantId};
use crate::config::CombatRules;
use crate::rng::RngSource;
use crate::view::BattleView;

pub use ai::{AiPolicy, BasicAttack, CastAbility, HealWhenLow, Tactic};
pub use player::{FnProvider, ScriptedProvider};

/// Who stands behind a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum ProviderKind {
    /// Human input; rejected choices are retried.
    #[strum(serialize = "player")]
    Player,
    /// Automated policy; rejected choices fall back to the default action.
    #[strum(serialize = "npc")]
    Npc,
}

/// A provider could not produce a decision.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no decision available: {0}")]
    Unavailable(String),

    #[error("decision timed out")]
    TimedOut,

    #[error("input closed")]
    Closed,
}

/// Everything a provider may consult when deciding.
pub struct DecisionContext<'a> {
    pub actor: CombatantId,
    pub view: BattleView<'a>,
    pub rules: &'a CombatRules,
    /// The battle's random source. Draws here are part of the battle's replay.
    pub rng: &'a mut dyn RngSource,
    /// Why the previous choice this turn was rejected.
    pub rejection: Option<&'a ActionError>,
    /// 1-based attempt number within the turn.
    pub attempt: u32,
}

impl<'a> DecisionContext<'a> {
    /// The acting combatant.
    pub fn combatant(&self) -> Option<&'a Combatant> {
        self.view.combatant(self.actor)
    }
}

/// Source of actions for one side.
pub trait DecisionProvider {
    fn kind(&self) -> ProviderKind;

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<Action, ProviderError>;
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn kind(&self) -> ProviderKind {
        (**self).kind()
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<Action, ProviderError> {
        (**self).decide(ctx)
    }
}
