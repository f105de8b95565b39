//! Battle participants and the intents they queue.
//!
//! Contains the unit data model, the per-round action type, and the pair of
//! rosters a battle is fought between.

pub mod action;
pub mod state;
pub mod unit;

pub use action::{Action, CommandKind};
pub use state::{target_options, Rosters};
pub use unit::{Side, Unit, UnitSnapshot};
