//! Damage and heal formulas.
//!
//! These compute the raw amounts only. Mitigation by the target's effective
//! defense happens in [`Combatant::incoming_damage`](crate::Combatant::incoming_damage)
//! so every damaging path shares one formula set.

use crate::config::CombatRules;
use crate::rng::RngSource;

/// Raw damage from a basic attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasicHit {
    pub raw: u32,
    pub critical: bool,
}

/// Raw basic-attack damage.
///
/// # Formula
///
/// ```text
/// raw = max(0, attack + variance(basic_attack_variance))
/// if critical: raw = raw * critical_multiplier_percent / 100
/// ```
///
/// The critical roll only consumes a draw when `critical_chance_percent > 0`.
pub fn basic_attack(attack: u32, rules: &CombatRules, rng: &mut (impl RngSource + ?Sized)) -> BasicHit {
    let raw = with_variance(attack, rules.basic_attack_variance, rng);
    let critical = rng.chance(rules.critical_chance_percent);
    let raw = if critical {
        scale_percent(raw, rules.critical_multiplier_percent)
    } else {
        raw
    };
    BasicHit { raw, critical }
}

/// Raw damage of an Attack ability: `max(0, attack + power + variance(ability_variance))`.
pub fn ability_attack(
    attack: u32,
    power: u32,
    rules: &CombatRules,
    rng: &mut (impl RngSource + ?Sized),
) -> u32 {
    with_variance(attack.saturating_add(power), rules.ability_variance, rng)
}

/// Heal amount: `power + uniform(0..=heal_bonus_max)`.
pub fn heal_amount(power: u32, rules: &CombatRules, rng: &mut (impl RngSource + ?Sized)) -> u32 {
    if rules.heal_bonus_max == 0 {
        return power;
    }
    power.saturating_add(rng.range(0, rules.heal_bonus_max))
}

fn with_variance(base: u32, spread: u32, rng: &mut (impl RngSource + ?Sized)) -> u32 {
    let value = i64::from(base) + rng.variance(spread);
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn scale_percent(value: u32, percent: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(percent) / 100;
    scaled.min(u64::from(u32::MAX)) as u32
}
