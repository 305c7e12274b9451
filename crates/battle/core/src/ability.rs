//! Ability definitions.
//!
//! Abilities are immutable and shared (`Arc<Ability>`) between every
//! combatant of a class. Resolution against a user and a target lives in the
//! battle resolver.

use crate::combatant::Roles;
use crate::stats::ModifiableStat;

/// Broad effect family of an ability.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum AbilityCategory {
    Attack,
    Heal,
    Buff,
    Debuff,
    Special,
}

/// Author-defined effect of a `Special` ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialEffect {
    /// Description only, no state change.
    #[default]
    Narrate,
    /// Brings a defeated ally back with `hp`. Requires HEALER.
    Revive { hp: u32 },
    /// Removes debuffs and provocation from an ally. Requires HEALER.
    Cleanse,
    /// Restores `power` MP to an ally. Requires HEALER.
    RestoreMana,
    /// The user guards an ally, adding its defense to the ally's. Requires TANK.
    Guard,
    /// Forces an opponent to target the user on its next turn. Requires TANK.
    Provoke,
}

impl SpecialEffect {
    pub const fn required_role(&self) -> Option<Roles> {
        match self {
            Self::Narrate => None,
            Self::Revive { .. } | Self::Cleanse | Self::RestoreMana => Some(Roles::HEALER),
            Self::Guard | Self::Provoke => Some(Roles::TANK),
        }
    }
}

/// Buff/debuff duration and the stat it changes. `power` is the amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSpec {
    pub stat: ModifiableStat,
    pub rounds: u32,
}

/// Which side an ability may target, relative to its user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Targeting {
    Opponent,
    Ally,
}

/// Whether an ability expects a living or a defeated target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetState {
    Living,
    Defeated,
}

/// A named action with a mana cost.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub mana_cost: u32,
    pub category: AbilityCategory,
    pub power: u32,
    /// Time-boxed stat change for Buff/Debuff. `None` keeps them narration-only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: Option<ModifierSpec>,
    /// Only consulted for `Special` abilities.
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: SpecialEffect,
}

impl Ability {
    pub fn new(name: impl Into<String>, category: AbilityCategory, mana_cost: u32, power: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            mana_cost,
            category,
            power,
            modifier: None,
            special: SpecialEffect::Narrate,
        }
    }

    pub fn special(name: impl Into<String>, effect: SpecialEffect, mana_cost: u32, power: u32) -> Self {
        Self {
            special: effect,
            ..Self::new(name, AbilityCategory::Special, mana_cost, power)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_modifier(mut self, stat: ModifiableStat, rounds: u32) -> Self {
        self.modifier = Some(ModifierSpec { stat, rounds });
        self
    }

    /// The special effect, if this is a `Special` ability.
    pub fn special_effect(&self) -> Option<SpecialEffect> {
        (self.category == AbilityCategory::Special).then_some(self.special)
    }

    pub fn targeting(&self) -> Targeting {
        match self.category {
            AbilityCategory::Attack | AbilityCategory::Debuff => Targeting::Opponent,
            AbilityCategory::Heal | AbilityCategory::Buff => Targeting::Ally,
            AbilityCategory::Special => match self.special {
                SpecialEffect::Narrate | SpecialEffect::Provoke => Targeting::Opponent,
                SpecialEffect::Revive { .. }
                | SpecialEffect::Cleanse
                | SpecialEffect::RestoreMana
                | SpecialEffect::Guard => Targeting::Ally,
            },
        }
    }

    pub fn target_state(&self) -> TargetState {
        match self.special_effect() {
            Some(SpecialEffect::Revive { .. }) => TargetState::Defeated,
            _ => TargetState::Living,
        }
    }

    pub fn required_role(&self) -> Option<Roles> {
        self.special_effect().and_then(|e| e.required_role())
    }

    /// True if a combatant with `roles` may use this ability.
    pub fn usable_by(&self, roles: Roles) -> bool {
        self.required_role().is_none_or(|r| roles.contains(r))
    }

    /// True if `mp` covers the cost.
    pub fn affordable(&self, mp: u32) -> bool {
        mp >= self.mana_cost
    }
}
