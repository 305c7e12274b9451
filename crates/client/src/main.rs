//! Battle client binary.
//!
//! Draws a random party and monster encounter, then plays the battle out on
//! the console. Narration goes to stdout, logs to stderr.
//!
//! # Examples
//!
//! ```bash
//! # AI against AI, reproducible
//! BATTLE_SEED=42 cargo run -p battle-client
//!
//! # Command the heroes yourself
//! BATTLE_INTERACTIVE=true cargo run -p battle-client
//!
//! # Machine-readable events
//! BATTLE_OUTPUT=json cargo run -p battle-client > battle.jsonl
//! ```

use anyhow::Result;
use battle_client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let summary = Client::builder(config).build()?.run().await?;
    tracing::info!(outcome = %summary.outcome, rounds = summary.rounds, "battle finished");

    Ok(())
}
