//! Stdout rendering: narration lines, roster status and the final summary.
//!
//! Logs go to stderr through `tracing`; everything here goes to stdout.

use std::fmt::Write as _;

use anyhow::Result;
use battle_core::{BattleView, Combatant, Side};
use battle_runtime::{BattleEnvelope, BattleSummary};

use crate::config::OutputFormat;

/// Renders battle events in the configured format.
#[derive(Clone, Copy, Debug)]
pub struct Narrator {
    format: OutputFormat,
}

impl Narrator {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, envelope: &BattleEnvelope) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Text => envelope.event.to_string(),
            OutputFormat::Json => serde_json::to_string(envelope)?,
        })
    }

    pub fn print(&self, envelope: &BattleEnvelope) -> Result<()> {
        println!("{}", self.render(envelope)?);
        Ok(())
    }

    pub fn print_summary(&self, summary: &BattleSummary) {
        if self.format == OutputFormat::Json {
            return;
        }
        println!();
        println!("{}", status(&summary.snapshot.view()));
        println!("{} after {} round(s).", capitalize(&summary.outcome.to_string()), summary.rounds);
    }
}

/// Both rosters, one combatant per line, with the target label used by the
/// console (`h1`, `m2`, ...).
pub fn status(view: &BattleView<'_>) -> String {
    let mut out = String::new();
    for side in [Side::Heroes, Side::Monsters] {
        let _ = writeln!(out, "== {side} ==");
        for combatant in view.roster(side).iter() {
            let _ = writeln!(out, "  {}", line(combatant));
        }
    }
    out.trim_end().to_owned()
}

fn line(combatant: &Combatant) -> String {
    let id = combatant.id();
    let prefix = match id.side {
        Side::Heroes => 'h',
        Side::Monsters => 'm',
    };
    let mut line = format!("{prefix}{} {combatant}", u32::from(id.slot) + 1);
    if combatant.is_defending() {
        line.push_str(" (defending)");
    }
    line
}

/// Abilities of `actor` with their costs, for the console prompt.
pub fn abilities(actor: &Combatant) -> String {
    if actor.abilities().is_empty() {
        return String::from("  (no abilities)");
    }
    actor
        .abilities()
        .iter()
        .map(|a| format!("  {} ({} MP) - {}", a.name, a.mana_cost, a.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
