//! Round resolution.
//!
//! Applies one round of queued actions to the rosters: the shared flee
//! roll, party actions in submission order, enemy attacks in roster order,
//! and the end-of-round termination check.

pub mod damage;
pub mod phase;
pub mod round;

pub use damage::{resolve_attack, roll_damage, DamageRoll};
pub use phase::RoundPhase;
pub use round::{
    resolve_round, ResolvedStep, RosterSnapshot, RoundReport, RoundResolver, RoundResult,
};
