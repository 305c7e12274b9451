//! Actions chosen by decision providers and the errors raised when one
//! cannot be executed.

use core::fmt;

use crate::combatant::{CombatantId, Roles};
use crate::error::{CombatError, ErrorSeverity};

/// One decision for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Basic attack against an opponent.
    Attack(CombatantId),
    /// Use a named ability on a target.
    UseAbility { ability: String, target: CombatantId },
    /// Defend stance until the combatant's next turn.
    Defend,
}

impl Action {
    pub fn ability(ability: impl Into<String>, target: CombatantId) -> Self {
        Self::UseAbility {
            ability: ability.into(),
            target,
        }
    }

    pub fn target(&self) -> Option<CombatantId> {
        match self {
            Self::Attack(target) | Self::UseAbility { target, .. } => Some(*target),
            Self::Defend => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack(target) => write!(f, "attack {target}"),
            Self::UseAbility { ability, target } => write!(f, "{ability} on {target}"),
            Self::Defend => f.write_str("defend"),
        }
    }
}

/// Why a requested action was rejected. A rejected action mutates nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the battle is already over")]
    BattleOver,

    #[error("{actor} cannot act")]
    ActorUnavailable { actor: CombatantId },

    #[error("{actor} does not know `{ability}`")]
    UnknownAbility { actor: CombatantId, ability: String },

    #[error("invalid target {target}: {reason}")]
    InvalidTarget {
        target: CombatantId,
        reason: TargetProblem,
    },

    #[error("`{ability}` requires the {role:?} role")]
    MissingRole { ability: String, role: Roles },
}

/// Detail for [`ActionError::InvalidTarget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum TargetProblem {
    #[strum(serialize = "no combatant in that slot")]
    Missing,
    #[strum(serialize = "target is defeated")]
    Defeated,
    #[strum(serialize = "target is still standing")]
    StillAlive,
    #[strum(serialize = "target must be an opponent")]
    NotAnOpponent,
    #[strum(serialize = "target must be an ally")]
    NotAnAlly,
    #[strum(serialize = "cannot target self")]
    SelfTarget,
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleOver => ErrorSeverity::Fatal,
            Self::ActorUnavailable { .. } => ErrorSeverity::Internal,
            Self::UnknownAbility { .. } | Self::InvalidTarget { .. } | Self::MissingRole { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleOver => "BATTLE_OVER",
            Self::ActorUnavailable { .. } => "ACTOR_UNAVAILABLE",
            Self::UnknownAbility { .. } => "UNKNOWN_ABILITY",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::MissingRole { .. } => "MISSING_ROLE",
        }
    }
}
