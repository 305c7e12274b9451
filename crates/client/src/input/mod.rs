//! Console input for interactive heroes.

mod command;
mod console;

pub use command::{Command, InputError, parse_command};
pub use console::run_console;
