//! Protocol session.
//!
//! Holds the game context and the current battle between commands and
//! turns each parsed command into protocol output.

use std::io::{self, Write};

use tracing::debug;

use super::format::{roster_line, LineWriter};
use super::parser::Command;
use crate::battle::{Battle, BattleStatus, Submission};
use crate::config::BattleSetup;
use crate::context::{GameContext, GameMode};
use crate::dice::RandomDice;
use crate::roster::{target_options, CommandKind, Side};
use crate::selection::IgnoreReason;

/// Mutable state of one protocol session.
pub struct Session<W: Write> {
    out: LineWriter<W>,
    context: GameContext,
    setup: BattleSetup,
    seed: u64,
    battles: u64,
    battle: Option<Battle<RandomDice>>,
}

impl<W: Write> Session<W> {
    /// Creates a session. A `seed` of 0 seeds every battle from entropy;
    /// otherwise battle `n` uses `seed + n`.
    pub fn new(setup: BattleSetup, seed: u64, out: W) -> Self {
        Session {
            out: LineWriter::new(out),
            context: GameContext::new(),
            setup,
            seed,
            battles: 0,
            battle: None,
        }
    }

    /// Handles one command. Returns false once the client asked to quit.
    pub fn handle(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Start => self.start(),
            Command::Choose { command, target } => self.choose(command, target),
            Command::Status => self.status(),
            Command::Targets => self.targets(),
            Command::Pause => {
                let paused = self.context.toggle_pause();
                self.out.line(&format!("paused {}", paused));
            }
            Command::Quit => {
                self.out.flush()?;
                return Ok(false);
            }
        }
        self.out.flush()?;
        Ok(true)
    }

    /// Reports a line that could not be parsed.
    pub fn report_error(&mut self, message: &str) -> io::Result<()> {
        self.out.line(&format!("error {}", message));
        self.out.flush()
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn battle(&self) -> Option<&Battle<RandomDice>> {
        self.battle.as_ref()
    }

    pub fn into_output(self) -> W {
        self.out.into_inner()
    }

    fn start(&mut self) {
        if !self.context.start_battle() {
            let reason = match self.context.mode {
                GameMode::Battle => "battle already running",
                GameMode::GameOver => "game over",
                GameMode::Overworld => "cannot start",
            };
            self.out.line(&format!("error {}", reason));
            return;
        }

        let seed = if self.seed == 0 {
            0
        } else {
            self.seed.wrapping_add(self.battles)
        };
        self.battles += 1;
        debug!(battle = self.battles, seed, "starting battle");

        let battle = self
            .battle
            .insert(Battle::new(&self.setup, RandomDice::seeded(seed)));
        battle.start(&mut self.out, &mut self.context);
        self.after_step();
    }

    fn choose(&mut self, command: CommandKind, target: usize) {
        if self.battle.is_none() && self.context.mode == GameMode::Overworld {
            self.start();
        }
        if self.context.paused {
            self.out
                .line(&format!("ignored {}", IgnoreReason::Paused.label()));
            return;
        }
        let Some(battle) = self.battle.as_mut() else {
            self.out
                .line(&format!("ignored {}", IgnoreReason::BattleOver.label()));
            return;
        };

        match battle.submit_choice(command, target, &mut self.out, &mut self.context) {
            Submission::Ignored(reason) => {
                self.out.line(&format!("ignored {}", reason.label()));
            }
            Submission::Queued { .. } | Submission::RoundResolved(_) => self.after_step(),
        }
    }

    /// Prints whose turn it is, or the outcome once the battle is over.
    fn after_step(&mut self) {
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        match battle.status() {
            BattleStatus::Selecting { actor } => {
                let name = battle
                    .rosters()
                    .unit(Side::Party, actor)
                    .map(|u| u.name().to_string())
                    .unwrap_or_default();
                self.out.line(&format!("turn {} {}", actor + 1, name));
            }
            BattleStatus::Over(outcome) => {
                self.out.line(&format!("outcome {}", outcome.label()));
            }
            BattleStatus::Pending | BattleStatus::Resolving => {}
        }
    }

    fn status(&mut self) {
        self.out.line(&format!("mode {}", mode_label(self.context.mode)));
        let Some(battle) = self.battle.as_ref() else {
            return;
        };
        for side in [Side::Party, Side::Enemy] {
            for (i, unit) in battle.snapshots(side).iter().enumerate() {
                self.out.line(&roster_line(side, i, unit));
            }
        }
        self.after_step();
    }

    fn targets(&mut self) {
        let options = match self.battle.as_ref() {
            Some(battle) => target_options(&battle.rosters().enemies),
            None => target_options(&self.setup.rosters().enemies),
        };
        for option in options {
            self.out.line(&format!("target {}", option));
        }
    }
}

fn mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Overworld => "overworld",
        GameMode::Battle => "battle",
        GameMode::GameOver => "game_over",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BattleConfig, UnitSpec};
    use crate::protocol::parser::parse_command;

    fn run(setup: BattleSetup, lines: &[&str]) -> Vec<String> {
        let mut session = Session::new(setup, 11, Vec::new());
        for line in lines {
            match parse_command(line) {
                Ok(Some(cmd)) => {
                    if !session.handle(cmd).unwrap() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => session.report_error(&e.to_string()).unwrap(),
            }
        }
        String::from_utf8(session.into_output())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn sure_escape() -> BattleSetup {
        BattleSetup {
            party: vec![UnitSpec::new("Fighter", 36, 10, 6)],
            enemies: vec![UnitSpec::new("Imp", 18, 6, 2)],
            config: BattleConfig {
                flee_chance: 1.0,
                ..BattleConfig::default()
            },
        }
    }

    #[test]
    fn start_prints_rosters_and_turn() {
        let lines = run(BattleSetup::default(), &["start"]);
        assert_eq!(lines[0], "log A battle begins!");
        assert_eq!(lines[1], "party 1 Fighter 36/36 alive");
        assert!(lines.contains(&"enemy 3 Wolf 34/34 alive".to_string()));
        assert_eq!(lines.last().unwrap(), "turn 1 Fighter");
    }

    #[test]
    fn run_escapes_with_certain_flee() {
        let lines = run(sure_escape(), &["run"]);
        assert!(lines.contains(&"log Party ran away!".to_string()));
        assert_eq!(lines.last().unwrap(), "outcome escaped");
        assert!(!lines.iter().any(|l| l.contains(" hits ")));
    }

    #[test]
    fn start_twice_is_an_error() {
        let lines = run(BattleSetup::default(), &["start", "start"]);
        assert_eq!(lines.last().unwrap(), "error battle already running");
    }

    #[test]
    fn paused_choices_are_ignored() {
        let lines = run(BattleSetup::default(), &["start", "pause", "fight 1"]);
        assert!(lines.contains(&"paused true".to_string()));
        assert_eq!(lines.last().unwrap(), "ignored paused");
    }

    #[test]
    fn choices_after_escape_are_ignored() {
        let lines = run(sure_escape(), &["run", "fight 1"]);
        assert_eq!(lines.last().unwrap(), "ignored battle_over");
    }

    #[test]
    fn new_battle_after_escape() {
        let lines = run(sure_escape(), &["run", "start"]);
        assert_eq!(lines.last().unwrap(), "turn 1 Fighter");
    }

    #[test]
    fn targets_list() {
        let lines = run(BattleSetup::default(), &["targets"]);
        assert_eq!(lines, vec!["target 1. Imp", "target 2. Imp", "target 3. Wolf"]);
    }

    #[test]
    fn parse_errors_are_reported() {
        let lines = run(BattleSetup::default(), &["fight zero"]);
        assert_eq!(
            lines,
            vec!["error invalid target 'zero': expected a number starting at 1"]
        );
    }

    #[test]
    fn quit_stops_processing() {
        let lines = run(BattleSetup::default(), &["quit", "start"]);
        assert!(lines.is_empty());
    }
}
