//! Resolves configuration into a ready-to-run [`Client`].

use anyhow::{Context, Result, ensure};
use battle_content::{
    CatalogLoader, ClassCatalog, ContentFactory, EncounterBuilder, RulesLoader, builtin_catalog,
};
use battle_core::{BattleConfig, CombatRules, PcgRng};
use battle_runtime::{BattleHost, BattleSetup, HostConfig};
use tracing::{debug, info};

use crate::Client;
use crate::config::ClientConfig;
use crate::presentation::Narrator;

/// Builder for [`Client`].
///
/// Loading order for content: built-in defaults, then `data_dir`, then the
/// explicit `rules_path` / `catalog_path` files.
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Loads content, draws the encounter and prepares the host.
    ///
    /// # Errors
    ///
    /// Returns an error if a data file cannot be read or parsed, or if the
    /// party or encounter cannot be built from the catalog.
    pub fn build(self) -> Result<Client> {
        let config = self.config;
        ensure!(config.party_size > 0, "party size must be at least 1");
        ensure!(config.monster_count > 0, "monster count must be at least 1");
        let capacity = BattleConfig::ROSTER_CAPACITY;
        ensure!(
            config.party_size <= capacity && config.monster_count <= capacity,
            "rosters hold at most {capacity} combatants (party {}, monsters {})",
            config.party_size,
            config.monster_count
        );

        let rules = load_rules(&config)?;
        let catalog = load_catalog(&config)?;
        debug!(classes = catalog.len(), ?rules, "content loaded");

        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "drawing encounter");

        let mut rng = PcgRng::seeded(seed);
        let mut encounter = EncounterBuilder::new(&catalog);
        if let Some(level) = config.level {
            encounter = encounter.at_level(level);
        }
        let heroes = encounter
            .party(config.party_size, &mut rng)
            .context("failed to build the hero party")?;
        let monsters = encounter
            .monsters(config.monster_count, &mut rng)
            .context("failed to build the monster encounter")?;

        let host = BattleHost::new(HostConfig {
            decision_timeout: config.decision_timeout,
            ..HostConfig::default()
        });
        let setup = BattleSetup::new(heroes, monsters).rules(rules).seed(seed);

        Ok(Client {
            host,
            setup,
            seed,
            interactive: config.interactive,
            narrator: Narrator::new(config.output),
        })
    }
}

fn load_rules(config: &ClientConfig) -> Result<CombatRules> {
    if let Some(path) = &config.rules_path {
        return RulesLoader::load(path);
    }
    match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_rules(),
        None => Ok(CombatRules::default()),
    }
}

fn load_catalog(config: &ClientConfig) -> Result<ClassCatalog> {
    let base = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_catalog()?,
        None => builtin_catalog(),
    };
    match &config.catalog_path {
        Some(path) => CatalogLoader::load_over(base, path),
        None => Ok(base),
    }
}
