//! Action execution.
//!
//! Execution is split in two phases. Planning resolves provocation and
//! validates the action against the current state without touching it;
//! application then mutates the rosters and emits narration. A rejected
//! action therefore leaves the battle unchanged.

use std::sync::Arc;

use tracing::debug;

use super::{Battle, TurnReport};
use crate::ability::{Ability, AbilityCategory, SpecialEffect, TargetState, Targeting};
use crate::action::{Action, ActionError, TargetProblem};
use crate::combat;
use crate::combatant::{Combatant, CombatantId, DamageReport};
use crate::event::{BattleEvent, NarrationSink};
use crate::rng::RngSource;
use crate::stats::{AddOutcome, ModifierKind, StatModifier};

/// A validated action, ready to apply.
enum Resolved {
    Attack(CombatantId),
    Ability {
        ability: Arc<Ability>,
        target: CombatantId,
    },
    Defend,
}

/// What the actor's provocation link does this turn.
enum Provocation {
    Free,
    /// The action is aimed at the provoker and the link is consumed.
    Forced {
        provoker: CombatantId,
        redirected: bool,
    },
}

struct Plan {
    action: Action,
    resolved: Resolved,
    provocation: Provocation,
}

impl<R: RngSource> Battle<R> {
    /// Validates `action` for `actor` and applies it.
    ///
    /// On error nothing is mutated and no event is emitted.
    pub fn execute(
        &mut self,
        actor: CombatantId,
        action: Action,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Result<TurnReport, ActionError> {
        let Plan {
            action,
            resolved,
            provocation,
        } = self.plan(actor, action)?;
        debug!(%actor, %action, round = self.round, "executing action");

        // A cast that fails for lack of mana keeps the provocation link.
        let affordable = match &resolved {
            Resolved::Ability { ability, .. } => self
                .living(actor)
                .is_some_and(|me| me.mp() >= ability.mana_cost),
            Resolved::Attack(_) | Resolved::Defend => true,
        };

        if let Some(me) = self.combatant_mut(actor) {
            me.set_defending(false);
        }
        match provocation {
            Provocation::Free => {}
            Provocation::Forced {
                provoker,
                redirected,
            } => {
                if affordable {
                    self.clear_provocation(actor);
                }
                if redirected {
                    sink.emit(BattleEvent::ForcedTarget {
                        actor: self.participant(actor),
                        provoker: self.participant(provoker),
                    });
                }
            }
        }

        let defeated = match resolved {
            Resolved::Attack(target) => self.basic_attack(actor, target, sink),
            Resolved::Ability { ability, target } => self.use_ability(actor, &ability, target, sink),
            Resolved::Defend => {
                if let Some(me) = self.combatant_mut(actor) {
                    me.set_defending(true);
                }
                sink.emit(BattleEvent::Defending {
                    actor: self.participant(actor),
                });
                None
            }
        };

        self.update_outcome(sink);
        Ok(TurnReport {
            actor,
            action,
            defeated: defeated.into_iter().collect(),
            outcome: self.outcome,
        })
    }

    // ===== planning =====

    fn plan(&self, actor: CombatantId, action: Action) -> Result<Plan, ActionError> {
        if self.is_over() {
            return Err(ActionError::BattleOver);
        }
        let me = self
            .living(actor)
            .ok_or(ActionError::ActorUnavailable { actor })?;

        let (action, provocation) = match me.provoked_by() {
            Some(provoker) if self.is_alive(provoker) => {
                let forced = redirect(me, &action, provoker)?;
                let redirected = forced != action;
                (
                    forced,
                    Provocation::Forced {
                        provoker,
                        redirected,
                    },
                )
            }
            // Links to a defeated provoker are released when it falls.
            _ => (action, Provocation::Free),
        };

        let resolved = self.validate(me, &action)?;
        Ok(Plan {
            action,
            resolved,
            provocation,
        })
    }

    fn validate(&self, me: &Combatant, action: &Action) -> Result<Resolved, ActionError> {
        match action {
            Action::Defend => Ok(Resolved::Defend),
            Action::Attack(target) => {
                self.check_target(me, *target, Targeting::Opponent, TargetState::Living)?;
                Ok(Resolved::Attack(*target))
            }
            Action::UseAbility { ability, target } => {
                let known = me.ability(ability).ok_or_else(|| ActionError::UnknownAbility {
                    actor: me.id(),
                    ability: ability.clone(),
                })?;
                if let Some(role) = known.required_role()
                    && !me.roles().contains(role)
                {
                    return Err(ActionError::MissingRole {
                        ability: known.name.clone(),
                        role,
                    });
                }

                self.check_target(me, *target, known.targeting(), known.target_state())?;
                if known.special_effect() == Some(SpecialEffect::Guard) && *target == me.id() {
                    return Err(ActionError::InvalidTarget {
                        target: *target,
                        reason: TargetProblem::SelfTarget,
                    });
                }

                Ok(Resolved::Ability {
                    ability: Arc::clone(known),
                    target: *target,
                })
            }
        }
    }

    fn check_target(
        &self,
        me: &Combatant,
        target: CombatantId,
        targeting: Targeting,
        state: TargetState,
    ) -> Result<(), ActionError> {
        let invalid = |reason| ActionError::InvalidTarget { target, reason };

        match targeting {
            Targeting::Opponent if !target.is_opponent_of(me.id()) => {
                return Err(invalid(TargetProblem::NotAnOpponent));
            }
            Targeting::Ally if target.side != me.side() => {
                return Err(invalid(TargetProblem::NotAnAlly));
            }
            _ => {}
        }

        let found = self
            .combatant(target)
            .ok_or(invalid(TargetProblem::Missing))?;
        match (state, found.is_alive()) {
            (TargetState::Living, false) => Err(invalid(TargetProblem::Defeated)),
            (TargetState::Defeated, true) => Err(invalid(TargetProblem::StillAlive)),
            _ => Ok(()),
        }
    }

    // ===== application =====

    fn basic_attack(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Option<CombatantId> {
        let attack = self.living(actor).map_or(0, Combatant::effective_attack);
        let hit = combat::basic_attack(attack, &self.rules, &mut self.rng);
        let report = self.strike(target, hit.raw);

        sink.emit(BattleEvent::Attacked {
            attacker: self.participant(actor),
            target: self.participant(target),
            damage: report.dealt,
            critical: hit.critical,
        });
        self.settle(target, report, sink)
    }

    fn use_ability(
        &mut self,
        actor: CombatantId,
        ability: &Ability,
        target: CombatantId,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Option<CombatantId> {
        let (spent, available) = match self.combatant_mut(actor) {
            Some(me) => {
                let available = me.mp();
                (me.spend_mana(ability.mana_cost), available)
            }
            None => (false, 0),
        };
        if !spent {
            sink.emit(BattleEvent::InsufficientMana {
                user: self.participant(actor),
                ability: ability.name.clone(),
                cost: ability.mana_cost,
                available,
            });
            return None;
        }

        match ability.category {
            AbilityCategory::Attack => {
                let attack = self.living(actor).map_or(0, Combatant::effective_attack);
                let raw = combat::ability_attack(attack, ability.power, &self.rules, &mut self.rng);
                let report = self.strike(target, raw);

                sink.emit(BattleEvent::AbilityDamage {
                    user: self.participant(actor),
                    ability: ability.name.clone(),
                    target: self.participant(target),
                    damage: report.dealt,
                });
                self.settle(target, report, sink)
            }
            AbilityCategory::Heal => {
                let amount = combat::heal_amount(ability.power, &self.rules, &mut self.rng);
                let healed = self.combatant_mut(target).map_or(0, |c| c.heal(amount));

                sink.emit(BattleEvent::Healed {
                    user: self.participant(actor),
                    ability: ability.name.clone(),
                    target: self.participant(target),
                    amount: healed,
                });
                None
            }
            AbilityCategory::Buff => {
                self.apply_modifier(actor, ability, target, ModifierKind::Buff, sink);
                None
            }
            AbilityCategory::Debuff => {
                self.apply_modifier(actor, ability, target, ModifierKind::Debuff, sink);
                None
            }
            AbilityCategory::Special => {
                self.apply_special(actor, ability, target, sink);
                None
            }
        }
    }

    fn apply_modifier(
        &mut self,
        actor: CombatantId,
        ability: &Ability,
        target: CombatantId,
        kind: ModifierKind,
        sink: &mut (impl NarrationSink + ?Sized),
    ) {
        let Some(spec) = ability.modifier else {
            self.narrate(actor, ability, target, sink);
            return;
        };

        let modifier = match kind {
            ModifierKind::Buff => StatModifier::buff(spec.stat, ability.power, spec.rounds),
            ModifierKind::Debuff => StatModifier::debuff(spec.stat, ability.power, spec.rounds),
        };
        let added = self
            .combatant_mut(target)
            .map_or(AddOutcome::Rejected, |c| c.modifiers_mut().add(modifier));

        if added == AddOutcome::Rejected {
            debug!(%target, ability = %ability.name, "modifier rejected");
            self.narrate(actor, ability, target, sink);
            return;
        }
        sink.emit(BattleEvent::ModifierApplied {
            user: self.participant(actor),
            ability: ability.name.clone(),
            target: self.participant(target),
            stat: spec.stat,
            kind,
            amount: ability.power,
            rounds: spec.rounds,
        });
    }

    fn apply_special(
        &mut self,
        actor: CombatantId,
        ability: &Ability,
        target: CombatantId,
        sink: &mut (impl NarrationSink + ?Sized),
    ) {
        let user = self.participant(actor);
        let name = ability.name.clone();

        match ability.special {
            SpecialEffect::Narrate => self.narrate(actor, ability, target, sink),
            SpecialEffect::Revive { hp } => {
                let Some(ward) = self.combatant_mut(target) else {
                    return;
                };
                if ward.revive(hp) {
                    let hp = ward.hp();
                    sink.emit(BattleEvent::Revived {
                        user,
                        ability: name,
                        target: self.participant(target),
                        hp,
                    });
                }
            }
            SpecialEffect::Cleanse => {
                let removed = self.combatant_mut(target).map_or(0, |c| {
                    let provoked = usize::from(c.provoked_by().is_some());
                    c.set_provoked_by(None);
                    c.modifiers_mut().clear_debuffs() + provoked
                });
                sink.emit(BattleEvent::Cleansed {
                    user,
                    ability: name,
                    target: self.participant(target),
                    removed,
                });
            }
            SpecialEffect::RestoreMana => {
                let amount = self
                    .combatant_mut(target)
                    .map_or(0, |c| c.restore_mana(ability.power));
                sink.emit(BattleEvent::ManaRestored {
                    user,
                    ability: name,
                    target: self.participant(target),
                    amount,
                });
            }
            SpecialEffect::Guard => {
                if let Some(ward) = self.combatant_mut(target) {
                    ward.set_defended_by(Some(actor));
                }
                sink.emit(BattleEvent::Guarding {
                    guard: user,
                    ward: self.participant(target),
                });
            }
            SpecialEffect::Provoke => {
                if let Some(victim) = self.combatant_mut(target) {
                    victim.set_provoked_by(Some(actor));
                }
                sink.emit(BattleEvent::Provoked {
                    provoker: user,
                    target: self.participant(target),
                });
            }
        }
    }

    fn narrate(
        &self,
        actor: CombatantId,
        ability: &Ability,
        target: CombatantId,
        sink: &mut (impl NarrationSink + ?Sized),
    ) {
        sink.emit(BattleEvent::AbilityNarrated {
            user: self.participant(actor),
            ability: ability.name.clone(),
            target: self.participant(target),
            description: ability.description.clone(),
        });
    }

    /// Mitigates `raw` and applies it to `target`.
    fn strike(&mut self, target: CombatantId, raw: u32) -> DamageReport {
        let missed = DamageReport {
            dealt: 0,
            defeated: false,
        };
        let Some(victim) = self.living(target) else {
            return missed;
        };

        let guard_defense = victim
            .defended_by()
            .and_then(|guard| self.living(guard))
            .map(Combatant::effective_defense);
        let amount = victim.incoming_damage(raw, guard_defense, &self.rules);

        self.combatant_mut(target)
            .map_or(missed, |c| c.take_damage(amount))
    }

    /// Announces a defeat and releases every link pointing at the fallen.
    fn settle(
        &mut self,
        target: CombatantId,
        report: DamageReport,
        sink: &mut (impl NarrationSink + ?Sized),
    ) -> Option<CombatantId> {
        if !report.defeated {
            return None;
        }

        debug!(%target, "combatant defeated");
        sink.emit(BattleEvent::Defeated {
            combatant: self.participant(target),
        });

        let mut released = self.heroes.release_links_to(target);
        released.extend(self.monsters.release_links_to(target));
        for link in released {
            sink.emit(BattleEvent::LinkReleased {
                holder: self.participant(link.holder),
                from: self.participant(link.released_from),
                kind: link.kind,
            });
        }
        Some(target)
    }

    fn clear_provocation(&mut self, actor: CombatantId) {
        if let Some(me) = self.combatant_mut(actor) {
            me.set_provoked_by(None);
        }
    }
}

/// Aims `action` at `provoker`. Opponent-targeting abilities keep their
/// ability; everything else becomes a basic attack.
fn redirect(me: &Combatant, action: &Action, provoker: CombatantId) -> Result<Action, ActionError> {
    match action {
        Action::UseAbility { ability, .. } => {
            let known = me.ability(ability).ok_or_else(|| ActionError::UnknownAbility {
                actor: me.id(),
                ability: ability.clone(),
            })?;
            Ok(match known.targeting() {
                Targeting::Opponent => Action::ability(ability.clone(), provoker),
                Targeting::Ally => Action::Attack(provoker),
            })
        }
        Action::Attack(_) | Action::Defend => Ok(Action::Attack(provoker)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassTag, HeroClass, MonsterKind};
    use crate::combatant::{LinkKind, Roles, Roster, Side};
    use crate::config::CombatRules;
    use crate::engine::Outcome;
    use crate::rng::PcgRng;
    use crate::stats::{CombatantStats, ModifiableStat};

    fn warrior(name: &str, hp: u32, mp: u32, attack: u32, defense: u32) -> Combatant {
        Combatant::new(
            ClassTag::Hero(HeroClass::Warrior),
            CombatantStats::new(name, hp, mp, attack, defense, 20),
        )
    }

    fn orc(name: &str, hp: u32, attack: u32, defense: u32) -> Combatant {
        Combatant::new(
            ClassTag::Monster(MonsterKind::Orc),
            CombatantStats::new(name, hp, 30, attack, defense, 15),
        )
    }

    fn battle(heroes: Vec<Combatant>, monsters: Vec<Combatant>) -> Battle {
        Battle::new(
            Roster::from_combatants(Side::Heroes, heroes).unwrap(),
            Roster::from_combatants(Side::Monsters, monsters).unwrap(),
            CombatRules::deterministic(),
            PcgRng::seeded(9),
        )
        .unwrap()
    }

    fn hp(b: &Battle, id: CombatantId) -> u32 {
        b.combatant(id).unwrap().hp()
    }

    const H0: CombatantId = CombatantId::hero(0);
    const H1: CombatantId = CombatantId::hero(1);
    const M0: CombatantId = CombatantId::monster(0);
    const M1: CombatantId = CombatantId::monster(1);

    #[test]
    fn basic_attack_subtracts_defense() {
        let mut b = battle(vec![warrior("Aria", 100, 0, 30, 10)], vec![orc("Orc", 100, 20, 10)]);
        let mut events = Vec::new();

        let report = b.execute(H0, Action::Attack(M0), &mut events).unwrap();
        assert_eq!(hp(&b, M0), 80);
        assert!(report.defeated.is_empty());
        assert_eq!(events[0].to_string(), "Aria attacks Orc for 20 damage.");
    }

    #[test]
    fn rejected_action_mutates_nothing() {
        let mut b = battle(vec![warrior("Aria", 100, 10, 30, 10)], vec![orc("Orc", 100, 20, 10)]);
        let before = b.snapshot();
        let mut events = Vec::new();

        let err = b
            .execute(H0, Action::ability("Meteor", M0), &mut events)
            .unwrap_err();
        assert!(matches!(err, ActionError::UnknownAbility { .. }));

        let err = b.execute(H0, Action::Attack(H0), &mut events).unwrap_err();
        assert_eq!(
            err,
            ActionError::InvalidTarget {
                target: H0,
                reason: TargetProblem::NotAnOpponent
            }
        );
        assert_eq!(b.snapshot(), before);
        assert!(events.is_empty());
    }

    #[test]
    fn insufficient_mana_is_narrated_without_effect() {
        let fireball = Arc::new(Ability::new("Fireball", AbilityCategory::Attack, 15, 20));
        let mage = warrior("Mira", 80, 10, 30, 10).with_abilities([fireball]);
        let mut b = battle(vec![mage], vec![orc("Orc", 100, 20, 10)]);
        let mut events = Vec::new();

        b.execute(H0, Action::ability("Fireball", M0), &mut events)
            .unwrap();
        assert_eq!(b.combatant(H0).unwrap().mp(), 10);
        assert_eq!(hp(&b, M0), 100);
        assert_eq!(
            events[0].to_string(),
            "Mira doesn't have enough MP to use Fireball! (10/15 MP)"
        );
    }

    #[test]
    fn ability_damage_adds_power() {
        let slash = Arc::new(Ability::new("Slash", AbilityCategory::Attack, 5, 15));
        let mut b = battle(
            vec![warrior("Aria", 100, 20, 30, 10).with_abilities([slash])],
            vec![orc("Orc", 100, 20, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("slash", M0), &mut events).unwrap();
        assert_eq!(hp(&b, M0), 65);
        assert_eq!(b.combatant(H0).unwrap().mp(), 15);
    }

    #[test]
    fn debuff_lowers_defense_until_expiry() {
        let war_cry = Arc::new(
            Ability::new("War Cry", AbilityCategory::Debuff, 12, 5)
                .with_modifier(ModifiableStat::Defense, 1),
        );
        let mut b = battle(
            vec![warrior("Aria", 100, 20, 30, 10).with_abilities([war_cry])],
            vec![orc("Orc", 100, 20, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("War Cry", M0), &mut events).unwrap();
        assert_eq!(b.combatant(M0).unwrap().effective_defense(), 5);

        b.begin_round(&mut events).unwrap();
        assert_eq!(b.combatant(M0).unwrap().effective_defense(), 10);
        assert!(events.iter().any(|e| matches!(e, BattleEvent::ModifierExpired { .. })));
    }

    #[test]
    fn defend_doubles_own_defense_until_next_turn() {
        let mut b = battle(vec![warrior("Aria", 100, 0, 30, 10)], vec![orc("Orc", 100, 25, 10)]);
        let mut events = Vec::new();

        b.execute(H0, Action::Defend, &mut events).unwrap();
        b.execute(M0, Action::Attack(H0), &mut events).unwrap();
        assert_eq!(hp(&b, H0), 95);

        b.execute(H0, Action::Attack(M0), &mut events).unwrap();
        assert!(!b.combatant(H0).unwrap().is_defending());
        b.execute(M0, Action::Attack(H0), &mut events).unwrap();
        assert_eq!(hp(&b, H0), 80);
    }

    #[test]
    fn guard_requires_tank_and_adds_defense() {
        let guard = Arc::new(Ability::special("Guard", SpecialEffect::Guard, 5, 0));
        let paladin = warrior("Paladin", 150, 20, 30, 15).with_abilities([Arc::clone(&guard)]);
        let mut b = battle(
            vec![paladin.clone(), warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 40, 10)],
        );
        let mut events = Vec::new();

        let err = b
            .execute(H0, Action::ability("Guard", H1), &mut events)
            .unwrap_err();
        assert!(matches!(err, ActionError::MissingRole { role: Roles::TANK, .. }));

        let mut b = battle(
            vec![paladin.with_roles(Roles::TANK), warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 40, 10)],
        );
        let err = b
            .execute(H0, Action::ability("Guard", H0), &mut events)
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::InvalidTarget {
                reason: TargetProblem::SelfTarget,
                ..
            }
        ));

        b.execute(H0, Action::ability("Guard", H1), &mut events).unwrap();
        b.execute(M0, Action::Attack(H1), &mut events).unwrap();
        // 40 - (5 + 15)
        assert_eq!(hp(&b, H1), 60);
    }

    #[test]
    fn guard_link_released_when_guard_falls() {
        let guard = Arc::new(Ability::special("Guard", SpecialEffect::Guard, 5, 0));
        let paladin = warrior("Paladin", 30, 20, 30, 15)
            .with_abilities([guard])
            .with_roles(Roles::TANK);
        let mut b = battle(
            vec![paladin, warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 60, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("Guard", H1), &mut events).unwrap();
        let report = b.execute(M0, Action::Attack(H0), &mut events).unwrap();

        assert_eq!(report.defeated, vec![H0]);
        assert_eq!(b.combatant(H1).unwrap().defended_by(), None);
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::LinkReleased {
                kind: LinkKind::Guard,
                ..
            }
        )));
    }

    #[test]
    fn provocation_redirects_once() {
        let taunt = Arc::new(Ability::special("Taunt", SpecialEffect::Provoke, 5, 0));
        let tank = warrior("Bran", 200, 20, 30, 20)
            .with_abilities([taunt])
            .with_roles(Roles::TANK);
        let mut b = battle(
            vec![tank, warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 40, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("Taunt", M0), &mut events).unwrap();
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), Some(H0));

        let report = b.execute(M0, Action::Attack(H1), &mut events).unwrap();
        assert_eq!(report.action, Action::Attack(H0));
        assert_eq!(hp(&b, H0), 180);
        assert_eq!(hp(&b, H1), 80);
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), None);

        b.execute(M0, Action::Attack(H1), &mut events).unwrap();
        assert_eq!(hp(&b, H1), 45);
    }

    #[test]
    fn provoker_death_restores_free_targeting() {
        let taunt = Arc::new(Ability::special("Taunt", SpecialEffect::Provoke, 5, 0));
        let tank = warrior("Bran", 30, 20, 30, 5)
            .with_abilities([taunt])
            .with_roles(Roles::TANK);
        let mut b = battle(
            vec![tank, warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 40, 10), orc("Brute", 100, 60, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("Taunt", M0), &mut events).unwrap();
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), Some(H0));

        let report = b.execute(M1, Action::Attack(H0), &mut events).unwrap();
        assert_eq!(report.defeated, vec![H0]);
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), None);
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::LinkReleased {
                kind: LinkKind::Provocation,
                ..
            }
        )));

        let report = b.execute(M0, Action::Attack(H1), &mut events).unwrap();
        assert_eq!(report.action, Action::Attack(H1));
        assert_eq!(hp(&b, H1), 45);
    }

    #[test]
    fn failed_cast_keeps_the_provocation() {
        let taunt = Arc::new(Ability::special("Taunt", SpecialEffect::Provoke, 5, 0));
        let tank = warrior("Bran", 200, 20, 30, 20)
            .with_abilities([taunt])
            .with_roles(Roles::TANK);
        let swing = Arc::new(Ability::new("Brutal Swing", AbilityCategory::Attack, 50, 18));
        let mut b = battle(
            vec![tank, warrior("Mage", 80, 0, 30, 5)],
            vec![orc("Orc", 100, 40, 10).with_abilities([swing])],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::ability("Taunt", M0), &mut events).unwrap();
        let report = b
            .execute(M0, Action::ability("Brutal Swing", H1), &mut events)
            .unwrap();
        assert_eq!(report.action, Action::ability("Brutal Swing", H0));
        assert_eq!(b.combatant(M0).unwrap().mp(), 30);
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), Some(H0));
        assert_eq!(hp(&b, H0), 200);

        let report = b.execute(M0, Action::Attack(H1), &mut events).unwrap();
        assert_eq!(report.action, Action::Attack(H0));
        assert_eq!(hp(&b, H0), 180);
        assert_eq!(b.combatant(M0).unwrap().provoked_by(), None);
    }

    #[test]
    fn revive_targets_only_the_fallen() {
        let revive = Arc::new(Ability::special("Revive", SpecialEffect::Revive { hp: 50 }, 25, 0));
        let druid = warrior("Druid", 120, 100, 25, 20)
            .with_abilities([revive])
            .with_roles(Roles::HEALER);
        let mut fallen = warrior("Bran", 200, 0, 30, 20);
        fallen.take_damage(200);
        let mut b = battle(vec![druid, fallen], vec![orc("Orc", 100, 40, 10)]);
        let mut events = Vec::new();

        let err = b
            .execute(H0, Action::ability("Revive", H0), &mut events)
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::InvalidTarget {
                reason: TargetProblem::StillAlive,
                ..
            }
        ));

        b.execute(H0, Action::ability("Revive", H1), &mut events).unwrap();
        assert_eq!(hp(&b, H1), 50);
        assert_eq!(b.combatant(H0).unwrap().mp(), 75);
    }

    #[test]
    fn last_kill_ends_battle_mid_round() {
        let mut b = battle(
            vec![warrior("Aria", 100, 0, 60, 10)],
            vec![orc("Orc 1", 40, 20, 10), orc("Orc 2", 30, 20, 10)],
        );
        let mut events = Vec::new();

        b.execute(H0, Action::Attack(M0), &mut events).unwrap();
        assert_eq!(b.outcome(), Outcome::InProgress);
        let report = b.execute(H0, Action::Attack(M1), &mut events).unwrap();

        assert_eq!(report.outcome, Outcome::HeroesWon);
        assert!(events.last().is_some_and(BattleEvent::is_terminal));
        assert_eq!(
            b.execute(M0, Action::Attack(H0), &mut events),
            Err(ActionError::BattleOver)
        );
    }
}
