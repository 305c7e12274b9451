//! Class tags and the templates looked up when building combatants.
//!
//! A class tag maps to a [`ClassTemplate`]: the stat range record, the
//! shared ability definitions and the role capabilities. Tags carry no
//! behaviour beyond lookup.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use crate::ability::Ability;
use crate::combatant::{Combatant, Roles, RosterError, Side};
use crate::error::{CombatError, ErrorSeverity};
use crate::rng::RngSource;
use crate::stats::{CombatantStats, StatRange, ValidationError};

/// Playable hero classes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum HeroClass {
    Mage,
    Druid,
    Warrior,
    Paladin,
}

/// Monster kinds used in encounters.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum MonsterKind {
    Golem,
    Orc,
    Troll,
    Undead,
    Dragon,
}

/// Type tag of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassTag {
    Hero(HeroClass),
    Monster(MonsterKind),
}

impl ClassTag {
    /// Side a combatant of this class fights on.
    pub const fn side(&self) -> Side {
        match self {
            Self::Hero(_) => Side::Heroes,
            Self::Monster(_) => Side::Monsters,
        }
    }

    /// Every known tag, heroes first.
    pub fn all() -> impl Iterator<Item = ClassTag> {
        use strum::IntoEnumIterator;

        HeroClass::iter()
            .map(ClassTag::Hero)
            .chain(MonsterKind::iter().map(ClassTag::Monster))
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hero(class) => class.fmt(f),
            Self::Monster(kind) => kind.fmt(f),
        }
    }
}

impl From<HeroClass> for ClassTag {
    fn from(class: HeroClass) -> Self {
        Self::Hero(class)
    }
}

impl From<MonsterKind> for ClassTag {
    fn from(kind: MonsterKind) -> Self {
        Self::Monster(kind)
    }
}

impl FromStr for ClassTag {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(class) = s.parse::<HeroClass>() {
            return Ok(Self::Hero(class));
        }
        s.parse::<MonsterKind>()
            .map(Self::Monster)
            .map_err(|_| SetupError::UnknownClass(s.to_owned()))
    }
}

/// Everything needed to build a combatant of one class.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTemplate {
    pub tag: ClassTag,
    pub range: StatRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<Arc<Ability>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub roles: Roles,
    /// Percent (0-100) used by the AI policy.
    #[cfg_attr(feature = "serde", serde(default = "ClassTemplate::default_aggressiveness"))]
    pub aggressiveness: u8,
}

impl ClassTemplate {
    pub const DEFAULT_AGGRESSIVENESS: u8 = 50;

    pub fn new(tag: ClassTag, range: StatRange) -> Self {
        Self {
            tag,
            range,
            abilities: Vec::new(),
            roles: Roles::empty(),
            aggressiveness: Self::DEFAULT_AGGRESSIVENESS,
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(Arc::new(ability));
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

    #[cfg(feature = "serde")]
    fn default_aggressiveness() -> u8 {
        Self::DEFAULT_AGGRESSIVENESS
    }

    /// Resolves the stat source to a validated stat bundle.
    pub fn stats_for(
        &self,
        name: &str,
        source: &StatSource,
        rng: &mut (impl RngSource + ?Sized),
    ) -> Result<CombatantStats, ValidationError> {
        let stats = match source {
            StatSource::Random => self.range.generate(name, rng),
            StatSource::Level(level) => self.range.at_level(name, *level),
            StatSource::Explicit(stats) => CombatantStats {
                name: name.to_owned(),
                ..stats.clone()
            },
        };
        // Generated stats are checked too; a malformed range must not build.
        self.range.check(&self.tag.to_string(), &stats)?;
        Ok(stats)
    }

    /// Builds a full-health combatant sharing this template's abilities.
    pub fn instantiate(&self, stats: CombatantStats) -> Combatant {
        Combatant::new(self.tag, stats)
            .with_abilities(self.abilities.iter().cloned())
            .with_roles(self.roles)
            .with_aggressiveness(self.aggressiveness)
    }
}

/// Read-only lookup of class templates.
pub trait ClassOracle: Send + Sync {
    fn template(&self, class: ClassTag) -> Option<&ClassTemplate>;

    fn range(&self, class: ClassTag) -> Option<&StatRange> {
        self.template(class).map(|t| &t.range)
    }

    /// Validates stats against the class range without building anything.
    fn validate(&self, class: ClassTag, stats: &CombatantStats) -> Result<(), SetupError> {
        let range = self.range(class).ok_or_else(|| SetupError::UnknownClass(class.to_string()))?;
        range.check(&class.to_string(), stats)?;
        Ok(())
    }
}

/// How a combatant's stats are produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatSource {
    /// Uniform draw per attribute from the class range.
    Random,
    /// Linear interpolation inside the class range.
    Level(u32),
    /// Caller-supplied stats, validated against the class range.
    Explicit(CombatantStats),
}

/// Request to build one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub class: ClassTag,
    pub name: String,
    pub source: StatSource,
}

impl CombatantSpec {
    pub fn random(class: impl Into<ClassTag>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            source: StatSource::Random,
        }
    }

    pub fn level(class: impl Into<ClassTag>, name: impl Into<String>, level: u32) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            source: StatSource::Level(level),
        }
    }

    /// Uses `stats` as given; the combatant takes the name in `stats`.
    pub fn explicit(class: impl Into<ClassTag>, stats: CombatantStats) -> Self {
        Self {
            class: class.into(),
            name: stats.name.clone(),
            source: StatSource::Explicit(stats),
        }
    }

    /// Builds the combatant, failing fast on an unknown class or bad stats.
    pub fn build(
        &self,
        oracle: &(impl ClassOracle + ?Sized),
        rng: &mut (impl RngSource + ?Sized),
    ) -> Result<Combatant, SetupError> {
        let template = oracle
            .template(self.class)
            .ok_or_else(|| SetupError::UnknownClass(self.class.to_string()))?;
        let stats = template.stats_for(&self.name, &self.source, rng)?;
        Ok(template.instantiate(stats))
    }
}

/// Errors raised while assembling combatants, rosters or a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("the {0} roster has no combatants")]
    EmptyRoster(Side),

    #[error("a {class} cannot join the {side} roster")]
    WrongSide { class: ClassTag, side: Side },

    #[error("expected the {expected} roster, got the {found} roster")]
    MisplacedRoster { expected: Side, found: Side },
}

impl CombatError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownClass(_) => "UNKNOWN_CLASS",
            Self::Validation(e) => e.error_code(),
            Self::Roster(e) => e.error_code(),
            Self::EmptyRoster(_) => "EMPTY_ROSTER",
            Self::WrongSide { .. } => "WRONG_SIDE",
            Self::MisplacedRoster { .. } => "MISPLACED_ROSTER",
        }
    }
}
