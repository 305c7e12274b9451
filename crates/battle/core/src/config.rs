/// Battle configuration constants and tunable combat rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub rules: CombatRules,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Slots per side. Positions are stable once assigned.
    pub const ROSTER_CAPACITY: usize = 5;
    /// Concurrent buff/debuff modifiers on a single combatant.
    pub const MAX_MODIFIERS: usize = 8;
    /// Highest level accepted by level-based stat generation.
    pub const MAX_LEVEL: u32 = 50;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: CombatRules) -> Self {
        Self { rules }
    }
}

/// Runtime-tunable combat formulas.
///
/// Every damaging action runs through the same pipeline:
///
/// ```text
/// raw    = attack (+ ability power) + variance      (floored at 0)
/// damage = max(1, raw - effective_defense / defense_divisor)
/// ```
///
/// With the defaults this is the direct-subtraction variant
/// (`max(1, attack - defense)` for a basic attack). Setting
/// `defense_divisor = 2` and `basic_attack_variance = 5` reproduces the
/// halved-defense variant with a ±5 window.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    /// Divisor applied to effective defense during mitigation (0 is treated as 1).
    pub defense_divisor: u32,
    /// Symmetric spread on basic-attack raw damage.
    pub basic_attack_variance: u32,
    /// Symmetric spread on ability attacks.
    pub ability_variance: u32,
    /// Upper bound of the uniform bonus added to heals.
    pub heal_bonus_max: u32,
    /// Upper bound of the uniform jitter added to speed when ordering a round.
    pub turn_jitter_max: u32,
    /// Chance (0-100) that a basic attack is critical.
    pub critical_chance_percent: u32,
    /// Damage multiplier for critical hits, in percent.
    pub critical_multiplier_percent: u32,
    /// HP percentage below which the AI considers healing.
    pub low_hp_threshold_percent: u32,
    /// Decisions requested from a player provider before forcing the default action.
    pub max_decision_attempts: u32,
}

impl CombatRules {
    pub const DEFAULT_DEFENSE_DIVISOR: u32 = 1;
    pub const DEFAULT_ABILITY_VARIANCE: u32 = 3;
    pub const DEFAULT_HEAL_BONUS_MAX: u32 = 9;
    pub const DEFAULT_TURN_JITTER_MAX: u32 = 9;
    pub const DEFAULT_CRITICAL_MULTIPLIER_PERCENT: u32 = 150;
    pub const DEFAULT_LOW_HP_THRESHOLD_PERCENT: u32 = 30;
    pub const DEFAULT_MAX_DECISION_ATTEMPTS: u32 = 3;

    /// Rules with every random term disabled. Used for exact-value scenarios.
    pub fn deterministic() -> Self {
        Self {
            ability_variance: 0,
            heal_bonus_max: 0,
            turn_jitter_max: 0,
            critical_chance_percent: 0,
            ..Self::default()
        }
    }

    pub fn with_defense_divisor(mut self, divisor: u32) -> Self {
        self.defense_divisor = divisor;
        self
    }

    pub fn with_basic_attack_variance(mut self, variance: u32) -> Self {
        self.basic_attack_variance = variance;
        self
    }

    pub fn with_critical_chance(mut self, percent: u32) -> Self {
        self.critical_chance_percent = percent.min(100);
        self
    }

    /// Divisor guarded against zero.
    pub(crate) fn divisor(&self) -> u32 {
        self.defense_divisor.max(1)
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            defense_divisor: Self::DEFAULT_DEFENSE_DIVISOR,
            basic_attack_variance: 0,
            ability_variance: Self::DEFAULT_ABILITY_VARIANCE,
            heal_bonus_max: Self::DEFAULT_HEAL_BONUS_MAX,
            turn_jitter_max: Self::DEFAULT_TURN_JITTER_MAX,
            critical_chance_percent: 0,
            critical_multiplier_percent: Self::DEFAULT_CRITICAL_MULTIPLIER_PERCENT,
            low_hp_threshold_percent: Self::DEFAULT_LOW_HP_THRESHOLD_PERCENT,
            max_decision_attempts: Self::DEFAULT_MAX_DECISION_ATTEMPTS,
        }
    }
}
