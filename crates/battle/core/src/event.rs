//! Narration events emitted by the battle.
//!
//! The core never prints. Each action produces an ordered list of
//! [`BattleEvent`]s pushed into a [`NarrationSink`]; their `Display` impl is
//! the human-readable narration line.

use core::fmt;

use crate::combatant::{CombatantId, LinkKind};
use crate::engine::Outcome;
use crate::stats::{ModifiableStat, ModifierKind};

/// A combatant reference carried by events: stable id plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: CombatantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: CombatantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One narrated step of the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    RoundStarted {
        round: u32,
        order: Vec<CombatantId>,
    },
    Attacked {
        attacker: Participant,
        target: Participant,
        damage: u32,
        critical: bool,
    },
    AbilityDamage {
        user: Participant,
        ability: String,
        target: Participant,
        damage: u32,
    },
    Healed {
        user: Participant,
        ability: String,
        target: Participant,
        amount: u32,
    },
    ModifierApplied {
        user: Participant,
        ability: String,
        target: Participant,
        stat: ModifiableStat,
        kind: ModifierKind,
        amount: u32,
        rounds: u32,
    },
    ModifierExpired {
        target: Participant,
        stat: ModifiableStat,
        kind: ModifierKind,
    },
    /// Ability with no mechanical effect; the description is the narration.
    AbilityNarrated {
        user: Participant,
        ability: String,
        target: Participant,
        description: String,
    },
    InsufficientMana {
        user: Participant,
        ability: String,
        cost: u32,
        available: u32,
    },
    Revived {
        user: Participant,
        ability: String,
        target: Participant,
        hp: u32,
    },
    ManaRestored {
        user: Participant,
        ability: String,
        target: Participant,
        amount: u32,
    },
    Cleansed {
        user: Participant,
        ability: String,
        target: Participant,
        removed: usize,
    },
    Guarding {
        guard: Participant,
        ward: Participant,
    },
    Provoked {
        provoker: Participant,
        target: Participant,
    },
    /// A provoked combatant's action was redirected at its provoker.
    ForcedTarget {
        actor: Participant,
        provoker: Participant,
    },
    LinkReleased {
        holder: Participant,
        from: Participant,
        kind: LinkKind,
    },
    Defending {
        actor: Participant,
    },
    Defeated {
        combatant: Participant,
    },
    /// The provider failed or kept choosing invalid actions.
    FallbackAction {
        actor: Participant,
        reason: String,
    },
    BattleEnded {
        outcome: Outcome,
        rounds: u32,
    },
}

impl BattleEvent {
    /// True for the event that ends the battle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::BattleEnded { .. })
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round, .. } => write!(f, "=== Round {round} ==="),
            Self::Attacked {
                attacker,
                target,
                damage,
                critical,
            } => {
                if *critical {
                    f.write_str("Critical hit! ")?;
                }
                write!(f, "{attacker} attacks {target} for {damage} damage.")
            }
            Self::AbilityDamage {
                user,
                ability,
                target,
                damage,
            } => write!(f, "{user} uses {ability} on {target} for {damage} damage!"),
            Self::Healed {
                user,
                ability,
                target,
                amount,
            } => write!(f, "{user} uses {ability} and restores {amount} HP to {target}."),
            Self::ModifierApplied {
                user,
                ability,
                target,
                stat,
                kind,
                amount,
                rounds,
            } => {
                let sign = match kind {
                    ModifierKind::Buff => '+',
                    ModifierKind::Debuff => '-',
                };
                write!(
                    f,
                    "{user} uses {ability}: {target} {sign}{amount} {stat} for {rounds} round(s)."
                )
            }
            Self::ModifierExpired { target, stat, kind } => {
                write!(f, "The {stat} {kind} on {target} wears off.")
            }
            Self::AbilityNarrated {
                user,
                ability,
                target,
                description,
            } => {
                write!(f, "{user} uses {ability} on {target}")?;
                if description.is_empty() {
                    f.write_str(".")
                } else {
                    write!(f, ": {description}.")
                }
            }
            Self::InsufficientMana {
                user,
                ability,
                cost,
                available,
            } => write!(
                f,
                "{user} doesn't have enough MP to use {ability}! ({available}/{cost} MP)"
            ),
            Self::Revived {
                user,
                ability,
                target,
                hp,
            } => write!(f, "{user} uses {ability}: {target} returns with {hp} HP!"),
            Self::ManaRestored {
                user,
                ability,
                target,
                amount,
            } => write!(f, "{user} uses {ability} and restores {amount} MP to {target}."),
            Self::Cleansed {
                user,
                ability,
                target,
                removed,
            } => write!(
                f,
                "{user} uses {ability} on {target}, removing {removed} effect(s)."
            ),
            Self::Guarding { guard, ward } => write!(f, "{guard} is now defending {ward}."),
            Self::Provoked { provoker, target } => {
                write!(f, "{provoker} provokes {target}!")
            }
            Self::ForcedTarget { actor, provoker } => {
                write!(f, "{actor} is provoked and turns on {provoker}!")
            }
            Self::LinkReleased { holder, from, kind } => match kind {
                LinkKind::Guard => write!(f, "{from} can no longer defend {holder}."),
                LinkKind::Provocation => write!(f, "{holder} is no longer provoked by {from}."),
            },
            Self::Defending { actor } => write!(f, "{actor} takes a defensive stance."),
            Self::Defeated { combatant } => write!(f, "{combatant} has been defeated!"),
            Self::FallbackAction { actor, reason } => {
                write!(f, "{actor} hesitates ({reason}) and falls back to a basic attack.")
            }
            Self::BattleEnded { outcome, rounds } => {
                write!(f, "Battle over after {rounds} round(s): {outcome}")
            }
        }
    }
}

/// Consumer of narration events.
pub trait NarrationSink {
    fn emit(&mut self, event: BattleEvent);
}

impl NarrationSink for Vec<BattleEvent> {
    fn emit(&mut self, event: BattleEvent) {
        self.push(event);
    }
}

impl<S: NarrationSink + ?Sized> NarrationSink for &mut S {
    fn emit(&mut self, event: BattleEvent) {
        (**self).emit(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NarrationSink for NullSink {
    fn emit(&mut self, _event: BattleEvent) {}
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(BattleEvent)> NarrationSink for FnSink<F> {
    fn emit(&mut self, event: BattleEvent) {
        (self.0)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: CombatantId, name: &str) -> Participant {
        Participant::new(id, name)
    }

    #[test]
    fn narration_lines() {
        let hero = p(CombatantId::hero(0), "Aria");
        let orc = p(CombatantId::monster(0), "Orc 1");

        let attack = BattleEvent::Attacked {
            attacker: hero.clone(),
            target: orc.clone(),
            damage: 20,
            critical: false,
        };
        assert_eq!(attack.to_string(), "Aria attacks Orc 1 for 20 damage.");

        let mana = BattleEvent::InsufficientMana {
            user: hero.clone(),
            ability: "Fireball".into(),
            cost: 15,
            available: 10,
        };
        assert_eq!(
            mana.to_string(),
            "Aria doesn't have enough MP to use Fireball! (10/15 MP)"
        );

        let defeated = BattleEvent::Defeated { combatant: orc };
        assert_eq!(defeated.to_string(), "Orc 1 has been defeated!");
    }

    #[test]
    fn sinks_collect_in_order() {
        fn emit_two(mut sink: impl NarrationSink) {
            sink.emit(BattleEvent::RoundStarted { round: 1, order: vec![] });
            sink.emit(BattleEvent::RoundStarted { round: 2, order: vec![] });
        }

        let mut events = Vec::new();
        emit_two(&mut events);
        assert_eq!(events.len(), 2);

        let mut count = 0;
        let mut counter = FnSink(|_| count += 1);
        counter.emit(BattleEvent::RoundStarted { round: 1, order: vec![] });
        drop(counter);
        assert_eq!(count, 1);
    }
}
