//! Game-wide context owned by whatever manages overworld and battle
//! transitions. Passed explicitly to the code that needs it.

use serde::Serialize;

use crate::event::Outcome;
use crate::present::Host;

/// Which part of the game currently has control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Overworld,
    Battle,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub mode: GameMode,
    pub paused: bool,
    pub last_outcome: Option<Outcome>,
}

impl Default for GameContext {
    fn default() -> Self {
        GameContext {
            mode: GameMode::Overworld,
            paused: false,
            last_outcome: None,
        }
    }
}

impl GameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands control to a battle. Returns false if one is already running
    /// or the game is over.
    pub fn start_battle(&mut self) -> bool {
        if self.mode != GameMode::Overworld {
            return false;
        }
        self.mode = GameMode::Battle;
        true
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Battle input is only taken while a battle runs unpaused.
    pub fn accepts_battle_input(&self) -> bool {
        self.mode == GameMode::Battle && !self.paused
    }
}

impl Host for GameContext {
    fn battle_ended(&mut self, outcome: Outcome) {
        self.last_outcome = Some(outcome);
        self.mode = match outcome {
            Outcome::Victory | Outcome::Escaped => GameMode::Overworld,
            Outcome::Defeat => GameMode::GameOver,
        };
    }
}
