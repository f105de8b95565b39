//! Skirmish: a turn-based party combat resolver.
//!
//! Exposes the roster model, damage model, selection and round resolution,
//! the battle controller, and the line protocol used by the binary.

pub mod battle;
pub mod config;
pub mod context;
pub mod dice;
pub mod event;
pub mod present;
pub mod protocol;
pub mod resolve;
pub mod roster;
pub mod selection;
pub mod simulate;

pub use battle::{Battle, BattleStatus, Submission};
pub use config::{
    load_setup, load_setup_from_str, BattleConfig, BattleSetup, ConfigError, UnitSpec,
};
pub use context::{GameContext, GameMode};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use event::{BattleEvent, Outcome};
pub use present::{Host, Presenter, Transcript};
pub use roster::{Action, CommandKind, Rosters, Side, Unit, UnitSnapshot};
pub use selection::{IgnoreReason, RoundPlan, Selection, SelectionStep};
