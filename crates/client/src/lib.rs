//! Battle client: composition root for a console battle.
//!
//! # Architecture
//!
//! ```text
//! Client
//!   ├─→ BattleHost (one battle worker task)
//!   ├─→ Narrator   (prints host events to stdout)
//!   └─→ Console    (optional, answers hero prompts from stdin)
//! ```
//!
//! Content (rules and class catalog) and the two rosters are resolved by
//! [`ClientBuilder`] before anything is spawned, so bad data files fail fast.

mod builder;
pub mod config;
pub mod input;
pub mod presentation;

pub use builder::ClientBuilder;
pub use config::{ClientConfig, OutputFormat};

use anyhow::{Context, Result};
use battle_runtime::{BattleHost, BattleSetup, BattleSummary, ChannelActionProvider, ProviderSlot};
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use presentation::Narrator;

/// Top-level client container.
#[derive(Debug)]
pub struct Client {
    host: BattleHost,
    setup: BattleSetup,
    seed: u64,
    interactive: bool,
    narrator: Narrator,
}

impl Client {
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Plays the battle to the end, printing narration as it happens.
    pub async fn run(self) -> Result<BattleSummary> {
        let Self {
            host,
            setup,
            seed,
            interactive,
            narrator,
        } = self;

        let mut events = host.subscribe();

        let (setup, console) = if interactive {
            let (provider, prompts) = ChannelActionProvider::new(1);
            let console = tokio::spawn(input::run_console(
                prompts,
                BufReader::new(tokio::io::stdin()),
            ));
            (setup.hero_provider(ProviderSlot::remote(provider)), Some(console))
        } else {
            (setup, None)
        };

        let handle = host.spawn(setup).context("failed to start the battle")?;
        info!(battle = %handle.id(), seed, interactive, "battle running");

        let printer = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(envelope) => {
                        narrator.print(&envelope)?;
                        if envelope.is_terminal() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "narration fell behind"),
                    Err(RecvError::Closed) => break,
                }
            }
            anyhow::Ok(())
        });

        let summary = match handle.join().await {
            Ok(summary) => summary,
            Err(err) => {
                printer.abort();
                return Err(err).context("battle worker failed");
            }
        };
        printer.await.context("narration task failed")??;

        // The console ends once the battle drops its provider, unless it is
        // still waiting on a line for a prompt that already timed out.
        if let Some(console) = console {
            if console.is_finished() {
                match console.await {
                    Ok(result) => result.context("console input failed")?,
                    Err(err) => warn!("console task ended abnormally: {err}"),
                }
            } else {
                console.abort();
            }
        }

        narrator.print_summary(&summary);
        Ok(summary)
    }
}
