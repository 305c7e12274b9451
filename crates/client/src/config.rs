//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How narration is written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per event.
    #[default]
    Text,
    /// One JSON object per event, tagged with the battle id.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format `{other}`")),
        }
    }
}

/// Battle client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Seed for encounter generation and the battle itself. Drawn at random
    /// when unset.
    pub seed: Option<u64>,
    /// Directory holding `rules.toml` and `classes.ron`.
    pub data_dir: Option<PathBuf>,
    /// Explicit rules file; wins over `data_dir`.
    pub rules_path: Option<PathBuf>,
    /// Explicit catalog file, overlaid on the built-in classes.
    pub catalog_path: Option<PathBuf>,
    pub party_size: usize,
    pub monster_count: usize,
    /// Level-interpolated stats instead of uniform draws.
    pub level: Option<u32>,
    /// Heroes take orders from stdin instead of the AI.
    pub interactive: bool,
    pub decision_timeout: Duration,
    pub output: OutputFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            data_dir: None,
            rules_path: None,
            catalog_path: None,
            party_size: 3,
            monster_count: 3,
            level: None,
            interactive: false,
            decision_timeout: Duration::from_secs(60),
            output: OutputFormat::Text,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - Random seed (default: random)
    /// - `BATTLE_DATA_DIR` - Directory with `rules.toml` / `classes.ron`
    /// - `BATTLE_RULES` - Rules TOML file
    /// - `BATTLE_CATALOG` - Class catalog RON file
    /// - `BATTLE_PARTY_SIZE` - Heroes in the party (default: 3)
    /// - `BATTLE_MONSTER_COUNT` - Monsters in the encounter (default: 3)
    /// - `BATTLE_LEVEL` - Build combatants at this level
    /// - `BATTLE_INTERACTIVE` - `true` to command the heroes (default: false)
    /// - `BATTLE_DECISION_TIMEOUT_MS` - Time allowed per decision (default: 60000)
    /// - `BATTLE_OUTPUT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            seed: read_env("BATTLE_SEED"),
            data_dir: read_env("BATTLE_DATA_DIR"),
            rules_path: read_env("BATTLE_RULES"),
            catalog_path: read_env("BATTLE_CATALOG"),
            party_size: read_env("BATTLE_PARTY_SIZE").unwrap_or(defaults.party_size),
            monster_count: read_env("BATTLE_MONSTER_COUNT").unwrap_or(defaults.monster_count),
            level: read_env("BATTLE_LEVEL"),
            interactive: read_env("BATTLE_INTERACTIVE").unwrap_or(defaults.interactive),
            decision_timeout: read_env::<u64>("BATTLE_DECISION_TIMEOUT_MS")
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or(defaults.decision_timeout),
            output: read_env("BATTLE_OUTPUT").unwrap_or(defaults.output),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}
