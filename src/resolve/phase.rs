//! Round phase sequencing.
//!
//! A round always walks the same four phases in order. Escape ends the round
//! early after `RunCheck`; a wiped side only cuts the action phases short.

/// A phase within one round of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    RunCheck,
    PlayerActions,
    EnemyActions,
    RoundEnd,
}

impl RoundPhase {
    pub const FIRST: RoundPhase = RoundPhase::RunCheck;

    /// The phase that follows this one, or `None` after `RoundEnd`.
    pub const fn next(self) -> Option<RoundPhase> {
        match self {
            RoundPhase::RunCheck => Some(RoundPhase::PlayerActions),
            RoundPhase::PlayerActions => Some(RoundPhase::EnemyActions),
            RoundPhase::EnemyActions => Some(RoundPhase::RoundEnd),
            RoundPhase::RoundEnd => None,
        }
    }
}
