//! Combat rules loader.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use battle_core::CombatRules;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat rules from TOML files.
pub struct RulesLoader;

impl RulesLoader {
    /// Load rules from a TOML file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatRules> {
        let content = read_file(path)?;
        let rules = Self::parse(&content)
            .with_context(|| format!("Failed to parse rules {}", path.display()))?;
        debug!(path = %path.display(), ?rules, "combat rules loaded");
        Ok(rules)
    }

    pub fn parse(content: &str) -> LoadResult<CombatRules> {
        let rules: CombatRules =
            toml::from_str(content).map_err(|e| anyhow::anyhow!("invalid rules TOML: {}", e))?;
        anyhow::ensure!(
            rules.critical_chance_percent <= 100,
            "critical_chance_percent must be at most 100"
        );
        anyhow::ensure!(
            rules.low_hp_threshold_percent <= 100,
            "low_hp_threshold_percent must be at most 100"
        );
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let rules = RulesLoader::parse("defense_divisor = 2\nbasic_attack_variance = 5\n").unwrap();
        assert_eq!(rules.defense_divisor, 2);
        assert_eq!(rules.basic_attack_variance, 5);
        assert_eq!(rules.turn_jitter_max, CombatRules::default().turn_jitter_max);
    }

    #[test]
    fn empty_table_is_default() {
        assert_eq!(RulesLoader::parse("").unwrap(), CombatRules::default());
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        assert!(RulesLoader::parse("critical_chance_percent = 150").is_err());
        assert!(RulesLoader::parse("defense_divisor = \"two\"").is_err());
    }
}
