//! Stat model: attribute bundles, per-class permitted ranges, validation and
//! randomized generation.
//!
//! [`CombatantStats`] is immutable once a combatant is built. Temporary
//! changes (buffs, debuffs) live in [`modifiers`] and are layered on top.

pub mod modifiers;

use core::fmt;

use crate::config::BattleConfig;
use crate::error::{CombatError, ErrorSeverity};
use crate::rng::RngSource;

pub use modifiers::{AddOutcome, ModifiableStat, ModifierKind, StatModifier, StatModifiers};

/// Attributes that make up a stat bundle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Attribute {
    #[strum(serialize = "HP")]
    Hp,
    #[strum(serialize = "MP")]
    Mp,
    Attack,
    Defense,
    Speed,
}

/// Inclusive `[min, max]` bounds for one attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Bounds that accept any value.
    pub const fn any() -> Self {
        Self::new(0, u32::MAX)
    }

    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Uniform draw inside the bounds.
    pub fn sample(&self, rng: &mut (impl RngSource + ?Sized)) -> u32 {
        rng.range(self.min, self.max)
    }

    /// Linear interpolation by level, `1` maps to `min`, `MAX_LEVEL` to `max`.
    pub fn at_level(&self, level: u32) -> u32 {
        let level = level.clamp(1, BattleConfig::MAX_LEVEL);
        let span = u64::from(self.max.saturating_sub(self.min));
        let steps = u64::from(BattleConfig::MAX_LEVEL - 1);
        self.min + (span * u64::from(level - 1) / steps) as u32
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Permitted attribute ranges for one class or monster kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatRange {
    pub hp: Bounds,
    pub mp: Bounds,
    pub attack: Bounds,
    pub defense: Bounds,
    /// Shared by every type; see [`StatRange::DEFAULT_SPEED`].
    #[cfg_attr(feature = "serde", serde(default = "StatRange::default_speed"))]
    pub speed: Bounds,
    pub description: String,
}

impl StatRange {
    /// Speed range drawn independently of the type.
    pub const DEFAULT_SPEED: Bounds = Bounds::new(10, 30);

    pub fn new(hp: Bounds, mp: Bounds, attack: Bounds, defense: Bounds) -> Self {
        Self {
            hp,
            mp,
            attack,
            defense,
            speed: Self::DEFAULT_SPEED,
            description: String::new(),
        }
    }

    /// A range that accepts every stat bundle.
    pub fn unbounded() -> Self {
        Self {
            hp: Bounds::any(),
            mp: Bounds::any(),
            attack: Bounds::any(),
            defense: Bounds::any(),
            speed: Bounds::any(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_speed(mut self, speed: Bounds) -> Self {
        self.speed = speed;
        self
    }

    #[cfg(feature = "serde")]
    fn default_speed() -> Bounds {
        Self::DEFAULT_SPEED
    }

    /// First attribute whose bounds are inverted (`min > max`), if any.
    pub fn inverted(&self) -> Option<Attribute> {
        use strum::IntoEnumIterator;

        Attribute::iter().find(|&attribute| {
            let bounds = self.bounds(attribute);
            bounds.min > bounds.max
        })
    }

    pub fn bounds(&self, attribute: Attribute) -> Bounds {
        match attribute {
            Attribute::Hp => self.hp,
            Attribute::Mp => self.mp,
            Attribute::Attack => self.attack,
            Attribute::Defense => self.defense,
            Attribute::Speed => self.speed,
        }
    }

    /// True iff every attribute lies inside its inclusive bounds.
    pub fn validate(&self, stats: &CombatantStats) -> bool {
        self.violations(stats).is_empty()
    }

    /// Validates `stats`, reporting every attribute that is out of range.
    pub fn check(&self, class: &str, stats: &CombatantStats) -> Result<(), ValidationError> {
        let violations = self.violations(stats);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                class: class.to_owned(),
                name: stats.name.clone(),
                violations,
            })
        }
    }

    fn violations(&self, stats: &CombatantStats) -> Vec<Violation> {
        use strum::IntoEnumIterator;

        Attribute::iter()
            .filter_map(|attribute| {
                let value = stats.get(attribute);
                let bounds = self.bounds(attribute);
                (!bounds.contains(value)).then_some(Violation {
                    attribute,
                    value,
                    bounds,
                })
            })
            .collect()
    }

    /// Draws every attribute uniformly from its bounds.
    ///
    /// Draw order is HP, MP, attack, defense, speed.
    pub fn generate(&self, name: impl Into<String>, rng: &mut (impl RngSource + ?Sized)) -> CombatantStats {
        CombatantStats {
            name: name.into(),
            max_hp: self.hp.sample(rng),
            max_mp: self.mp.sample(rng),
            attack: self.attack.sample(rng),
            defense: self.defense.sample(rng),
            speed: self.speed.sample(rng),
        }
    }

    /// Deterministic stats for a level, always inside the bounds.
    pub fn at_level(&self, name: impl Into<String>, level: u32) -> CombatantStats {
        CombatantStats {
            name: name.into(),
            max_hp: self.hp.at_level(level),
            max_mp: self.mp.at_level(level),
            attack: self.attack.at_level(level),
            defense: self.defense.at_level(level),
            speed: self.speed.at_level(level),
        }
    }
}

/// Base attribute bundle of a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantStats {
    pub name: String,
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl CombatantStats {
    pub fn new(
        name: impl Into<String>,
        max_hp: u32,
        max_mp: u32,
        attack: u32,
        defense: u32,
        speed: u32,
    ) -> Self {
        Self {
            name: name.into(),
            max_hp,
            max_mp,
            attack,
            defense,
            speed,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Hp => self.max_hp,
            Attribute::Mp => self.max_mp,
            Attribute::Attack => self.attack,
            Attribute::Defense => self.defense,
            Attribute::Speed => self.speed,
        }
    }
}

/// One attribute outside its permitted bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Violation {
    pub attribute: Attribute,
    pub value: u32,
    pub bounds: Bounds,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (allowed {})",
            self.attribute, self.value, self.bounds
        )
    }
}

/// Stats outside the permitted range for their class.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("stats for {name} are out of range for {class}: {}", format_violations(.violations))]
pub struct ValidationError {
    pub class: String,
    pub name: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.violations.iter().map(|v| v.attribute)
    }
}

impl CombatError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "STATS_OUT_OF_RANGE"
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}
