//! Deterministic combat rules for turn-based party battles.
//!
//! `battle-core` defines the stat model, combatants and rosters, abilities,
//! the turn scheduler and the battle resolver. It performs no I/O: input
//! arrives through [`DecisionProvider`]s and narration leaves through a
//! [`NarrationSink`]. All state mutation flows through [`engine::Battle`], and
//! the content, runtime and client crates depend on the types re-exported
//! here.
pub mod ability;
pub mod action;
pub mod class;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod event;
pub mod rng;
pub mod stats;
pub mod view;

pub use ability::{Ability, AbilityCategory, ModifierSpec, SpecialEffect, TargetState, Targeting};
pub use action::{Action, ActionError, TargetProblem};
pub use class::{
    ClassOracle, ClassTag, ClassTemplate, CombatantSpec, HeroClass, MonsterKind, SetupError,
    StatSource,
};
pub use combatant::{
    Combatant, CombatantId, DamageReport, LinkKind, ReleasedLink, Roles, Roster, RosterError, Side,
};
pub use config::{BattleConfig, CombatRules};
pub use decision::{
    AiPolicy, BasicAttack, CastAbility, DecisionContext, DecisionProvider, FnProvider,
    HealWhenLow, ProviderError, ProviderKind, ScriptedProvider, Tactic,
};
pub use engine::{Battle, Outcome, ScheduledTurn, TurnError, TurnReport};
pub use error::{CombatError, ErrorSeverity};
pub use event::{BattleEvent, FnSink, NarrationSink, NullSink, Participant};
pub use rng::{PcgRng, RngSource};
pub use stats::{
    AddOutcome, Attribute, Bounds, CombatantStats, ModifiableStat, ModifierKind, StatModifier,
    StatModifiers, StatRange, ValidationError, Violation,
};
pub use view::{BattleSnapshot, BattleView};
