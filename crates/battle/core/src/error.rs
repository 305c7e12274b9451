//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`ValidationError`, `ActionError`, ...) live next to
//! the code that raises them. This module holds what they share: a severity
//! classification and the [`CombatError`] trait.
//!
//! Construction-time errors fail fast before a combatant enters a roster.
//! In-battle errors are always recovered inside the turn; the round loop never
//! ends because of one.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller can retry with a different choice (e.g. another target).
    Recoverable,

    /// Invalid input that must be corrected before retrying (e.g. stats out of range).
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// The battle cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not by impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
