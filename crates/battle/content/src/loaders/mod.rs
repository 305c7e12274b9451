//! Content loaders for reading battle data from files.
//!
//! Catalogs are RON lists of `ClassTemplate`s; combat rules are TOML tables
//! of `CombatRules` fields, every field optional.

pub mod catalog;
pub mod factory;
pub mod rules;

pub use catalog::CatalogLoader;
pub use factory::ContentFactory;
pub use rules::RulesLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
