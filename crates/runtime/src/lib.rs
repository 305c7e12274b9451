//! Async orchestration for hosting battles.
//!
//! This crate wraps [`battle_core::Battle`] in worker tasks so many battles can
//! run side by side, each owned exclusively by its own task. Consumers spawn
//! battles through [`BattleHost`], plug in async [`ActionProvider`]s for remote
//! or human input, and follow progress through the event bus.
//!
//! Modules are organized by responsibility:
//! - [`host`] spawns battles and shares the host-wide event bus
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] broadcasts narration tagged with the originating battle
//! - [`workers`] keeps the per-battle task internal to the crate
pub mod api;
pub mod events;
pub mod host;

mod workers;

pub use api::{
    ActionProvider, BattleHandle, BattleId, BattleSummary, ChannelActionProvider,
    DecisionPrompt, DecisionRequest, ProviderSlot, Result, RuntimeError,
};
pub use events::{BattleEnvelope, EventBus};
pub use host::{BattleHost, BattleSetup, HostConfig};
