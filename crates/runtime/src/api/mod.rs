//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the host and worker can stay focused on orchestration.

pub mod errors;
pub mod handle;
pub mod providers;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use errors::{Result, RuntimeError};
pub use handle::{BattleHandle, BattleSummary};
pub use providers::{
    ActionProvider, ChannelActionProvider, DecisionPrompt, DecisionRequest, ProviderSlot,
};

/// Identifies a battle within one [`crate::BattleHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattleId(pub u64);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "battle#{}", self.0)
    }
}
