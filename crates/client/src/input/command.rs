//! Console command grammar.
//!
//! ```text
//! attack <target>          basic attack
//! cast <ability> <target>  use an ability (name is case-insensitive)
//! defend                   defensive stance until the next turn
//! status | help
//! ```
//!
//! Targets are `m<n>` for monsters and `h<n>` for heroes, counting from 1.
//! A bare number means a monster.

use battle_core::{Action, BattleConfig, Combatant, CombatantId, Side};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Status,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("nothing entered (try `help`)")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("missing target")]
    MissingTarget,

    #[error("invalid target `{0}`; use m1..m{max} or h1..h{max}", max = BattleConfig::ROSTER_CAPACITY)]
    InvalidTarget(String),

    #[error("{actor} has no ability named `{name}`")]
    UnknownAbility { actor: String, name: String },
}

/// Parses one console line for `actor`.
pub fn parse_command(line: &str, actor: &Combatant) -> Result<Command, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, rest)) = words.split_first() else {
        return Err(InputError::Empty);
    };

    match verb.to_ascii_lowercase().as_str() {
        "attack" | "a" => {
            let target = rest.first().ok_or(InputError::MissingTarget)?;
            Ok(Command::Act(Action::Attack(parse_target(target)?)))
        }
        "cast" | "c" => {
            let Some((target, name)) = rest.split_last() else {
                return Err(InputError::MissingTarget);
            };
            if name.is_empty() {
                return Err(InputError::MissingTarget);
            }
            let target = parse_target(target)?;
            let wanted = name.join(" ");
            let ability = actor
                .abilities()
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(&wanted))
                .ok_or_else(|| InputError::UnknownAbility {
                    actor: actor.name().to_owned(),
                    name: wanted.clone(),
                })?;
            Ok(Command::Act(Action::ability(ability.name.clone(), target)))
        }
        "defend" | "d" => Ok(Command::Act(Action::Defend)),
        "status" | "s" => Ok(Command::Status),
        "help" | "h" | "?" => Ok(Command::Help),
        _ => Err(InputError::UnknownCommand((*verb).to_owned())),
    }
}

fn parse_target(token: &str) -> Result<CombatantId, InputError> {
    let invalid = || InputError::InvalidTarget(token.to_owned());

    let lower = token.to_ascii_lowercase();
    let (side, digits) = match lower.as_bytes().first() {
        Some(b'm') => (Side::Monsters, &lower[1..]),
        Some(b'h') => (Side::Heroes, &lower[1..]),
        _ => (Side::Monsters, lower.as_str()),
    };

    let n: usize = digits.parse().map_err(|_| invalid())?;
    if !(1..=BattleConfig::ROSTER_CAPACITY).contains(&n) {
        return Err(invalid());
    }
    let slot = u8::try_from(n - 1).map_err(|_| invalid())?;
    Ok(CombatantId { side, slot })
}
