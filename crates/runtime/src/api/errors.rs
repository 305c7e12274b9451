//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from battle setup, the turn loop and worker coordination so
//! clients can bubble them up with consistent context. Bad decisions never
//! show up here; the worker recovers them inside the turn.
use battle_core::{CombatError, ErrorSeverity, SetupError, TurnError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Severity of the underlying failure; worker plumbing is always internal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(e) => e.severity(),
            Self::Turn(e) => e.severity(),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }
}
