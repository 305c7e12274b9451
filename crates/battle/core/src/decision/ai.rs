//! Automated decision policy for NPC-controlled sides.
//!
//! An [`AiPolicy`] is a priority chain of [`Tactic`]s evaluated left to right;
//! the first tactic that proposes an action wins (selector semantics).
//!
//! The standard chain:
//!
//! 1. [`HealWhenLow`]: below the low-HP threshold with an affordable heal,
//!    heal self with probability `100 - aggressiveness`.
//! 2. [`CastAbility`]: with mana left, and with probability `aggressiveness`,
//!    use the first affordable ability that has a sensible target.
//! 3. [`BasicAttack`]: basic attack on the focus target.
//!
//! Opponent targets default to the lowest-HP living opponent, unless a live
//! provoker forces the target.

use tracing::trace;

use crate::ability::{Ability, AbilityCategory, SpecialEffect, Targeting};
use crate::action::Action;
use crate::combatant::{Combatant, CombatantId};
use crate::stats::{ModifierKind, StatModifier};
use crate::view::BattleView;

use super::{DecisionContext, DecisionProvider, ProviderError, ProviderKind};

/// One link of the policy chain.
pub trait Tactic: Send + Sync {
    fn name(&self) -> &'static str;

    /// Proposes an action, or `None` to let the next tactic decide.
    fn propose(&self, ctx: &mut DecisionContext<'_>) -> Option<Action>;
}

/// Heal self when HP drops below the configured threshold.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealWhenLow;

impl Tactic for HealWhenLow {
    fn name(&self) -> &'static str {
        "heal-when-low"
    }

    fn propose(&self, ctx: &mut DecisionContext<'_>) -> Option<Action> {
        let me = ctx.combatant()?;
        if me.hp_percent() >= ctx.rules.low_hp_threshold_percent {
            return None;
        }

        let heal = me.abilities().iter().find(|a| {
            a.category == AbilityCategory::Heal && a.affordable(me.mp()) && a.usable_by(me.roles())
        })?;

        let caution = 100 - u32::from(me.aggressiveness());
        if !ctx.rng.chance(caution) {
            return None;
        }
        Some(Action::ability(heal.name.clone(), me.id()))
    }
}

/// Prefer an ability over a basic attack, weighted by aggressiveness.
#[derive(Clone, Copy, Debug, Default)]
pub struct CastAbility;

impl Tactic for CastAbility {
    fn name(&self) -> &'static str {
        "cast-ability"
    }

    fn propose(&self, ctx: &mut DecisionContext<'_>) -> Option<Action> {
        let me = ctx.combatant()?;
        if me.mp() == 0 || me.abilities().is_empty() {
            return None;
        }
        if !ctx.rng.chance(u32::from(me.aggressiveness())) {
            return None;
        }

        let view = ctx.view;
        me.abilities()
            .iter()
            .filter(|a| a.affordable(me.mp()) && a.usable_by(me.roles()))
            .find_map(|ability| {
                let target = pick_target(&view, me, ability)?;
                Some(Action::ability(ability.name.clone(), target))
            })
    }
}

/// Basic attack on the focus target. Always proposes while an opponent lives.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicAttack;

impl Tactic for BasicAttack {
    fn name(&self) -> &'static str {
        "basic-attack"
    }

    fn propose(&self, ctx: &mut DecisionContext<'_>) -> Option<Action> {
        let me = ctx.combatant()?;
        opponent_target(&ctx.view, me).map(Action::Attack)
    }
}

/// Forced provoker if alive, otherwise the lowest-HP living opponent.
pub(crate) fn opponent_target(view: &BattleView<'_>, me: &Combatant) -> Option<CombatantId> {
    if let Some(provoker) = me.provoked_by().and_then(|id| view.living(id)) {
        return Some(provoker.id());
    }
    view.focus_target(me.side()).map(Combatant::id)
}

/// A target that makes the ability worth casting, if any.
fn pick_target(view: &BattleView<'_>, me: &Combatant, ability: &Ability) -> Option<CombatantId> {
    if ability.targeting() == Targeting::Opponent {
        return opponent_target(view, me);
    }

    let allies = || view.living_on(me.side());
    match (ability.category, ability.special_effect()) {
        (AbilityCategory::Heal, _) => allies()
            .filter(|c| c.hp() < c.max_hp())
            .min_by_key(|c| (c.hp_percent(), c.id().slot))
            .map(Combatant::id),
        (AbilityCategory::Buff, _) => {
            let already = ability.modifier.is_some_and(|spec| {
                me.modifiers()
                    .iter()
                    .any(|m: &StatModifier| m.stat == spec.stat && m.kind == ModifierKind::Buff)
            });
            (!already).then_some(me.id())
        }
        (_, Some(SpecialEffect::Revive { .. })) => view
            .roster(me.side())
            .iter()
            .find(|c| !c.is_alive())
            .map(Combatant::id),
        (_, Some(SpecialEffect::Cleanse)) => allies()
            .find(|c| c.provoked_by().is_some() || c.modifiers().iter().any(|m| m.kind == ModifierKind::Debuff))
            .map(Combatant::id),
        (_, Some(SpecialEffect::RestoreMana)) => allies()
            .filter(|c| c.mp() < c.max_mp())
            .min_by_key(|c| (c.mp(), c.id().slot))
            .map(Combatant::id),
        (_, Some(SpecialEffect::Guard)) => allies()
            .filter(|c| c.id() != me.id() && c.defended_by() != Some(me.id()))
            .min_by_key(|c| (c.hp(), c.id().slot))
            .map(Combatant::id),
        _ => None,
    }
}

/// Selector over a list of tactics.
pub struct AiPolicy {
    tactics: Vec<Box<dyn Tactic>>,
}

impl AiPolicy {
    pub fn new(tactics: Vec<Box<dyn Tactic>>) -> Self {
        Self { tactics }
    }

    /// Heal when low, then abilities, then basic attack.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(HealWhenLow),
            Box::new(CastAbility),
            Box::new(BasicAttack),
        ])
    }

    /// Basic attacks only.
    pub fn brute() -> Self {
        Self::new(vec![Box::new(BasicAttack)])
    }
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for AiPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tactics.iter().map(|t| t.name()))
            .finish()
    }
}

impl DecisionProvider for AiPolicy {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Npc
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<Action, ProviderError> {
        for tactic in &self.tactics {
            if let Some(action) = tactic.propose(ctx) {
                trace!(actor = %ctx.actor, tactic = tactic.name(), %action, "ai decision");
                return Ok(action);
            }
        }
        Err(ProviderError::Unavailable(format!(
            "no tactic applies to {}",
            ctx.actor
        )))
    }
}
