use std::io::Write as _;

use anyhow::Result;
use battle_runtime::DecisionPrompt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::command::{Command, parse_command};
use crate::presentation;

/// Answers hero decision prompts from console lines.
///
/// Runs until the battle drops its provider or the input ends. A prompt left
/// unanswered when input ends is dropped, so the battle falls back to the
/// default action.
pub async fn run_console<R>(mut prompts: mpsc::Receiver<DecisionPrompt>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(prompt) = prompts.recv().await {
        let view = prompt.request.snapshot.view();
        let Some(actor) = view.living(prompt.request.actor) else {
            debug!(actor = %prompt.request.actor, "prompt for a combatant that cannot act");
            continue;
        };

        if let Some(rejection) = &prompt.request.rejection {
            println!("  ! {rejection}");
        } else {
            println!("\n{}", presentation::status(&view));
        }

        let action = loop {
            print!("{} ({}/{} HP, {} MP)> ", actor.name(), actor.hp(), actor.max_hp(), actor.mp());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                info!("console input closed");
                return Ok(());
            };

            match parse_command(&line, actor) {
                Ok(Command::Act(action)) => break action,
                Ok(Command::Status) => println!("{}", presentation::status(&view)),
                Ok(Command::Help) => {
                    println!("  attack <target> | cast <ability> <target> | defend | status");
                    println!("  targets: m1, m2, ... for monsters, h1, h2, ... for heroes");
                    println!("{}", presentation::abilities(actor));
                }
                Err(err) => println!("  {err}"),
            }
        };

        if prompt.respond(action).is_err() {
            println!("  Too slow! The moment has passed.");
        }
    }

    Ok(())
}
