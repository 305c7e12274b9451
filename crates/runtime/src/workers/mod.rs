//! Worker tasks that back the host.
//!
//! Each battle is driven by one [`BattleWorker`] that owns its state outright;
//! nothing else ever touches a battle's rosters.

mod battle;

pub use battle::{BattleWorker, Command};
