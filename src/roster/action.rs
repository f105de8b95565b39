//! Queued intents.
//!
//! One action is queued per living party member during selection and one is
//! generated per living enemy during the enemy phase. Actions never outlive
//! the round they were queued in.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::unit::Side;

/// The command a unit chose for the round.
///
/// `Magic` and `Item` are accepted and queued but resolve as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Fight,
    Run,
    Magic,
    Item,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Fight,
        CommandKind::Run,
        CommandKind::Magic,
        CommandKind::Item,
    ];

    /// Whether the command carries an enemy target.
    pub const fn takes_target(self) -> bool {
        !matches!(self, CommandKind::Run)
    }

    /// Parses the lowercase protocol verb.
    pub fn from_verb(verb: &str) -> Option<CommandKind> {
        match verb {
            "fight" => Some(CommandKind::Fight),
            "run" => Some(CommandKind::Run),
            "magic" => Some(CommandKind::Magic),
            "item" => Some(CommandKind::Item),
            _ => None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Fight => "Fight",
            CommandKind::Run => "Run",
            CommandKind::Magic => "Magic",
            CommandKind::Item => "Item",
        };
        f.write_str(name)
    }
}

/// A single queued intent.
///
/// `target` indexes the opposing roster and is only a hint: it is
/// revalidated when the action resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    pub side: Side,
    pub actor: usize,
    pub command: CommandKind,
    pub target: Option<usize>,
}

impl Action {
    /// A party member's choice. `target` is dropped for commands that take none.
    pub fn party(actor: usize, command: CommandKind, target: usize) -> Self {
        Action {
            side: Side::Party,
            actor,
            command,
            target: command.takes_target().then_some(target),
        }
    }

    /// An enemy attack on a party member.
    pub fn enemy_attack(actor: usize, target: usize) -> Self {
        Action {
            side: Side::Enemy,
            actor,
            command: CommandKind::Fight,
            target: Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_drops_target() {
        let action = Action::party(2, CommandKind::Run, 1);
        assert_eq!(action.target, None);
        assert_eq!(action.side, Side::Party);
    }

    #[test]
    fn fight_keeps_target() {
        let action = Action::party(0, CommandKind::Fight, 2);
        assert_eq!(action.target, Some(2));
    }

    #[test]
    fn verbs_parse() {
        for kind in CommandKind::ALL {
            let verb = kind.to_string().to_lowercase();
            assert_eq!(CommandKind::from_verb(&verb), Some(kind));
        }
        assert_eq!(CommandKind::from_verb("defend"), None);
    }

    #[test]
    fn enemy_attack_is_fight() {
        let action = Action::enemy_attack(1, 3);
        assert_eq!(action.side, Side::Enemy);
        assert_eq!(action.command, CommandKind::Fight);
        assert_eq!(action.target, Some(3));
    }
}
