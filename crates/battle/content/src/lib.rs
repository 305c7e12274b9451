//! Data-driven battle content and loaders.
//!
//! This crate houses the built-in class catalog and provides loaders for
//! RON/TOML data files:
//! - Class catalogs: stat ranges, ability lists, roles (RON)
//! - Combat rules (TOML)
//! - Random hero parties and monster encounters
//!
//! Content is consumed through battle-core's [`battle_core::ClassOracle`] and
//! never appears in battle state except as the combatants it builds.

pub mod catalog;
pub mod encounter;
pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ClassCatalog;
pub use encounter::{EncounterBuilder, roster_from_specs};
pub use presets::builtin_catalog;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ContentFactory, LoadResult, RulesLoader};
