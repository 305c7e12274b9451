//! Content factory for assembling battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::CombatRules;
use tracing::info;

use crate::catalog::ClassCatalog;
use crate::loaders::{CatalogLoader, LoadResult, RulesLoader};
use crate::presets::builtin_catalog;

/// Loads battle content from a data directory, falling back to built-ins
/// for any file that is absent.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// └── classes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const RULES_FILE: &'static str = "rules.toml";
    pub const CATALOG_FILE: &'static str = "classes.ron";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Combat rules from `rules.toml`, or the defaults.
    pub fn load_rules(&self) -> LoadResult<CombatRules> {
        let path = self.data_dir.join(Self::RULES_FILE);
        if !path.exists() {
            info!(path = %path.display(), "no rules file, using defaults");
            return Ok(CombatRules::default());
        }
        RulesLoader::load(&path)
    }

    /// Built-in catalog overlaid with `classes.ron`, if present.
    pub fn load_catalog(&self) -> LoadResult<ClassCatalog> {
        let path = self.data_dir.join(Self::CATALOG_FILE);
        if !path.exists() {
            info!(path = %path.display(), "no catalog file, using built-in classes");
            return Ok(builtin_catalog());
        }
        CatalogLoader::load_over(builtin_catalog(), &path)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fall_back_to_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_rules().unwrap(), CombatRules::default());
        assert_eq!(factory.load_catalog().unwrap(), builtin_catalog());
        assert_eq!(factory.data_dir(), dir.path());
    }

    #[test]
    fn rules_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ContentFactory::RULES_FILE), "turn_jitter_max = 0\n").unwrap();

        let rules = ContentFactory::new(dir.path()).load_rules().unwrap();
        assert_eq!(rules.turn_jitter_max, 0);
    }
}
