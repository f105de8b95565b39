//! Battle protocol command parser.
//!
//! Parses one line of client input into a [`Command`]. Targets are written
//! 1-based, as the target list shows them, and stored 0-based.

use crate::roster::CommandKind;

/// Errors for lines that name a known verb but cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("invalid target '{0}': expected a number starting at 1")]
    InvalidTarget(String),
    #[error("{0} takes no arguments")]
    UnexpectedArgument(&'static str),
}

/// A parsed client command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin a battle from the overworld.
    Start,
    /// Submit a choice for the party member whose turn it is.
    Choose { command: CommandKind, target: usize },
    /// Print both rosters and whose turn it is.
    Status,
    /// Print the target list.
    Targets,
    /// Toggle the pause flag.
    Pause,
    Quit,
}

/// Parses a single line of input.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match verb {
        "start" => no_args("start", args, Command::Start)?,
        "status" => no_args("status", args, Command::Status)?,
        "targets" => no_args("targets", args, Command::Targets)?,
        "pause" => no_args("pause", args, Command::Pause)?,
        "quit" => no_args("quit", args, Command::Quit)?,
        "run" => no_args(
            "run",
            args,
            Command::Choose {
                command: CommandKind::Run,
                target: 0,
            },
        )?,
        other => match CommandKind::from_verb(other) {
            Some(command) => Command::Choose {
                command,
                target: parse_target(args)?,
            },
            None => return Err(CommandError::Unknown(other.to_string())),
        },
    };
    Ok(Some(command))
}

fn no_args(verb: &'static str, args: &[&str], command: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnexpectedArgument(verb))
    }
}

/// Parses an optional 1-based target. A missing target means the first one.
fn parse_target(args: &[&str]) -> Result<usize, CommandError> {
    match args {
        [] => Ok(0),
        [raw] => match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(CommandError::InvalidTarget(raw.to_string())),
        },
        _ => Err(CommandError::InvalidTarget(args.join(" "))),
    }
}
