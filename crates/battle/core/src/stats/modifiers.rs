//! Time-boxed stat modifiers applied by Buff and Debuff abilities.
//!
//! # Round-based Duration
//!
//! Each modifier stores the number of round boundaries it survives. The
//! battle calls [`StatModifiers::tick`] at the start of every round; a
//! modifier applied with `rounds = 1` therefore lasts for the remainder of the
//! round it was cast in.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Stats that modifiers can change. HP and MP are resources, not modifiable.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ModifiableStat {
    Attack,
    Defense,
    Speed,
}

/// Direction of a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    #[strum(serialize = "buff")]
    Buff,
    #[strum(serialize = "debuff")]
    Debuff,
}

/// A single active modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: ModifiableStat,
    pub kind: ModifierKind,
    /// Unsigned magnitude; the sign comes from `kind`.
    pub amount: u32,
    pub rounds_left: u32,
}

impl StatModifier {
    pub fn buff(stat: ModifiableStat, amount: u32, rounds: u32) -> Self {
        Self {
            stat,
            kind: ModifierKind::Buff,
            amount,
            rounds_left: rounds,
        }
    }

    pub fn debuff(stat: ModifiableStat, amount: u32, rounds: u32) -> Self {
        Self {
            stat,
            kind: ModifierKind::Debuff,
            amount,
            rounds_left: rounds,
        }
    }

    /// Signed contribution to the stat.
    pub fn delta(&self) -> i64 {
        match self.kind {
            ModifierKind::Buff => i64::from(self.amount),
            ModifierKind::Debuff => -i64::from(self.amount),
        }
    }
}

/// Active modifiers on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifiers {
    entries: ArrayVec<StatModifier, { BattleConfig::MAX_MODIFIERS }>,
}

/// Outcome of [`StatModifiers::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An existing modifier of the same stat and kind was refreshed.
    Refreshed,
    /// No free slot or zero duration; the modifier was dropped.
    Rejected,
}

impl StatModifiers {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a modifier.
    ///
    /// Same stat and kind do not stack: the stronger amount and the longer
    /// duration are kept.
    pub fn add(&mut self, modifier: StatModifier) -> AddOutcome {
        if modifier.rounds_left == 0 {
            return AddOutcome::Rejected;
        }

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|m| m.stat == modifier.stat && m.kind == modifier.kind)
        {
            existing.amount = existing.amount.max(modifier.amount);
            existing.rounds_left = existing.rounds_left.max(modifier.rounds_left);
            return AddOutcome::Refreshed;
        }

        match self.entries.try_push(modifier) {
            Ok(()) => AddOutcome::Added,
            Err(_) => AddOutcome::Rejected,
        }
    }

    /// Net signed change on `stat`.
    pub fn total(&self, stat: ModifiableStat) -> i64 {
        self.entries
            .iter()
            .filter(|m| m.stat == stat)
            .map(StatModifier::delta)
            .sum()
    }

    /// `base` with every modifier on `stat` applied, floored at 0.
    pub fn apply(&self, stat: ModifiableStat, base: u32) -> u32 {
        let value = i64::from(base) + self.total(stat);
        value.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Advances one round boundary and returns the modifiers that expired.
    pub fn tick(&mut self) -> Vec<StatModifier> {
        let mut expired = Vec::new();
        for modifier in self.entries.iter_mut() {
            modifier.rounds_left = modifier.rounds_left.saturating_sub(1);
            if modifier.rounds_left == 0 {
                expired.push(*modifier);
            }
        }
        self.entries.retain(|m| m.rounds_left > 0);
        expired
    }

    /// Removes every debuff, returning how many were removed.
    pub fn clear_debuffs(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|m| m.kind != ModifierKind::Debuff);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatModifier> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
