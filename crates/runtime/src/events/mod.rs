//! Broadcast bus for battle narration.
//!
//! Every [`battle_core::BattleEvent`] a battle emits is wrapped in a
//! [`BattleEnvelope`] naming its battle, then published both on the battle's
//! own bus and on the host-wide bus.

mod bus;

pub use bus::{BattleEnvelope, EventBus};
