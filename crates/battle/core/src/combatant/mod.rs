//! Combatants: one entity type for heroes and monsters.
//!
//! Role-specific behaviour is data: a [`Roles`] capability set plus the
//! ability list attached at construction. Aliveness is derived from HP.

mod roster;

use core::fmt;
use std::sync::Arc;

use crate::ability::Ability;
use crate::class::ClassTag;
use crate::config::CombatRules;
use crate::stats::{CombatantStats, ModifiableStat, StatModifiers};

pub use roster::{LinkKind, ReleasedLink, Roster, RosterError};

/// Which side of the battle a combatant fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[strum(serialize = "heroes")]
    Heroes,
    #[strum(serialize = "monsters")]
    Monsters,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Heroes => Self::Monsters,
            Self::Monsters => Self::Heroes,
        }
    }
}

/// Stable position of a combatant: side plus roster slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId {
    pub side: Side,
    pub slot: u8,
}

impl CombatantId {
    pub const fn hero(slot: u8) -> Self {
        Self {
            side: Side::Heroes,
            slot,
        }
    }

    pub const fn monster(slot: u8) -> Self {
        Self {
            side: Side::Monsters,
            slot,
        }
    }

    pub const fn is_opponent_of(&self, other: CombatantId) -> bool {
        !matches!(
            (self.side, other.side),
            (Side::Heroes, Side::Heroes) | (Side::Monsters, Side::Monsters)
        )
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.side, self.slot)
    }
}

bitflags::bitflags! {
    /// Capabilities that unlock role-gated special effects.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Roles: u8 {
        /// Can guard allies and provoke enemies.
        const TANK = 1 << 0;
        /// Can revive, cleanse and restore mana.
        const HEALER = 1 << 1;
        /// Damage dealer. Carries no gated effect of its own.
        const STRIKER = 1 << 2;
    }
}

/// Result of [`Combatant::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    /// HP actually removed.
    pub dealt: u32,
    /// True when this hit took the combatant from alive to 0 HP.
    pub defeated: bool,
}

/// A participant in battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    id: CombatantId,
    class: ClassTag,
    stats: CombatantStats,
    hp: u32,
    mp: u32,
    abilities: Vec<Arc<Ability>>,
    roles: Roles,
    /// Percent chance the AI prefers an ability or declines to heal.
    aggressiveness: u8,
    /// Ally whose defense is added to ours while it lives.
    defended_by: Option<CombatantId>,
    /// Opponent we must target on our next turn.
    provoked_by: Option<CombatantId>,
    /// Defend stance until our next turn.
    defending: bool,
    modifiers: StatModifiers,
}

impl Combatant {
    /// Creates a combatant at full HP and MP.
    ///
    /// The id is a placeholder until the combatant is placed in a [`Roster`].
    pub fn new(class: ClassTag, stats: CombatantStats) -> Self {
        Self {
            id: CombatantId::hero(0),
            class,
            hp: stats.max_hp,
            mp: stats.max_mp,
            stats,
            abilities: Vec::new(),
            roles: Roles::empty(),
            aggressiveness: 50,
            defended_by: None,
            provoked_by: None,
            defending: false,
            modifiers: StatModifiers::empty(),
        }
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = Arc<Ability>>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_aggressiveness(mut self, percent: u8) -> Self {
        self.aggressiveness = percent.min(100);
        self
    }

    pub(crate) fn assign_id(&mut self, id: CombatantId) {
        self.id = id;
    }

    // ===== accessors =====

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.id.side
    }

    pub fn name(&self) -> &str {
        &self.stats.name
    }

    pub fn class(&self) -> ClassTag {
        self.class
    }

    pub fn stats(&self) -> &CombatantStats {
        &self.stats
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn max_mp(&self) -> u32 {
        self.stats.max_mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// HP as a percentage of max HP, rounded down.
    pub fn hp_percent(&self) -> u32 {
        if self.stats.max_hp == 0 {
            return 0;
        }
        (u64::from(self.hp) * 100 / u64::from(self.stats.max_hp)) as u32
    }

    pub fn abilities(&self) -> &[Arc<Ability>] {
        &self.abilities
    }

    /// Looks up an ability by name, ignoring ASCII case.
    pub fn ability(&self, name: &str) -> Option<&Arc<Ability>> {
        self.abilities
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }

    pub fn aggressiveness(&self) -> u8 {
        self.aggressiveness
    }

    pub fn defended_by(&self) -> Option<CombatantId> {
        self.defended_by
    }

    pub fn provoked_by(&self) -> Option<CombatantId> {
        self.provoked_by
    }

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn modifiers(&self) -> &StatModifiers {
        &self.modifiers
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut StatModifiers {
        &mut self.modifiers
    }

    // ===== effective stats =====

    pub fn effective_attack(&self) -> u32 {
        self.modifiers
            .apply(ModifiableStat::Attack, self.stats.attack)
    }

    pub fn effective_defense(&self) -> u32 {
        self.modifiers
            .apply(ModifiableStat::Defense, self.stats.defense)
    }

    pub fn effective_speed(&self) -> u32 {
        self.modifiers.apply(ModifiableStat::Speed, self.stats.speed)
    }

    // ===== resource operations =====

    /// Applies damage, clamped to a minimum of 1 and flooring HP at 0.
    ///
    /// Hitting an already-defeated combatant deals nothing.
    pub fn take_damage(&mut self, amount: u32) -> DamageReport {
        if !self.is_alive() {
            return DamageReport {
                dealt: 0,
                defeated: false,
            };
        }

        let dealt = amount.max(1).min(self.hp);
        self.hp -= dealt;

        let defeated = self.hp == 0;
        if defeated {
            self.on_defeat();
        }

        DamageReport { dealt, defeated }
    }

    /// Restores HP up to max. No effect on a defeated combatant.
    ///
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.stats.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Brings a defeated combatant back with `hp` (at least 1, at most max).
    ///
    /// Returns false and changes nothing if the combatant is alive.
    pub fn revive(&mut self, hp: u32) -> bool {
        if self.is_alive() || self.stats.max_hp == 0 {
            return false;
        }
        self.hp = hp.clamp(1, self.stats.max_hp);
        true
    }

    /// Deducts mana iff enough is available.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mp < amount {
            return false;
        }
        self.mp -= amount;
        true
    }

    /// Restores MP up to max, returning the amount restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.stats.max_mp - self.mp);
        self.mp += restored;
        restored
    }

    /// Damage this combatant would take from `raw` incoming damage.
    ///
    /// Effective defense is own defense, plus `guard_defense` when a live
    /// guard is defending us, plus own defense again while in Defend stance.
    /// The result is never below 1.
    pub fn incoming_damage(&self, raw: u32, guard_defense: Option<u32>, rules: &CombatRules) -> u32 {
        let own = self.effective_defense();
        let stance = if self.defending { own } else { 0 };
        let defense = own
            .saturating_add(guard_defense.unwrap_or(0))
            .saturating_add(stance);

        raw.saturating_sub(defense / rules.divisor()).max(1)
    }

    // ===== links and stances =====

    pub(crate) fn set_defended_by(&mut self, guard: Option<CombatantId>) {
        self.defended_by = guard;
    }

    pub(crate) fn set_provoked_by(&mut self, provoker: Option<CombatantId>) {
        self.provoked_by = provoker;
    }

    pub(crate) fn set_defending(&mut self, defending: bool) {
        self.defending = defending;
    }

    /// Drops state that only makes sense while alive.
    fn on_defeat(&mut self) {
        self.defended_by = None;
        self.provoked_by = None;
        self.defending = false;
        self.modifiers.clear();
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {}/{} HP, {}/{} MP",
            self.stats.name, self.class, self.hp, self.stats.max_hp, self.mp, self.stats.max_mp
        )?;
        if !self.is_alive() {
            f.write_str(" (defeated)")?;
        }
        Ok(())
    }
}
