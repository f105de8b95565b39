//! Events produced while a battle runs.
//!
//! Resolution is synchronous: the resolver produces a list of events and the
//! host decides how to pace and display them.

use std::fmt;

use serde::Serialize;

use crate::roster::{CommandKind, UnitSnapshot};

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Victory,
    Defeat,
    Escaped,
}

impl Outcome {
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::Victory => "victory",
            Outcome::Defeat => "defeat",
            Outcome::Escaped => "escaped",
        }
    }
}

/// A single presentable occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStarted,
    Chose {
        actor: String,
        command: CommandKind,
    },
    Fled,
    FleeFailed,
    Hit {
        attacker: String,
        defender: String,
        damage: u32,
        critical: bool,
        defender_health: u32,
    },
    /// A fight action found no living target.
    Ineffective {
        actor: String,
    },
    /// A runner whose flee attempt failed loses the rest of the round.
    Forfeited {
        actor: String,
    },
    /// Magic and items queue normally but do nothing.
    NoEffect {
        actor: String,
        command: CommandKind,
    },
    RoundSummary {
        round: u32,
        party: Vec<UnitSnapshot>,
    },
    Ended {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// True for events that carry damage.
    pub fn is_damage(&self) -> bool {
        matches!(self, BattleEvent::Hit { .. })
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::BattleStarted => write!(f, "A battle begins!"),
            BattleEvent::Chose { actor, command } => write!(f, "{} chooses {}.", actor, command),
            BattleEvent::Fled => write!(f, "Party ran away!"),
            BattleEvent::FleeFailed => write!(f, "Couldn't run!"),
            BattleEvent::Hit {
                attacker,
                defender,
                damage,
                critical,
                ..
            } => {
                write!(f, "{} hits {} for {}.", attacker, defender, damage)?;
                if *critical {
                    write!(f, " Critical hit!")?;
                }
                Ok(())
            }
            BattleEvent::Ineffective { .. } => write!(f, "Ineffective."),
            BattleEvent::Forfeited { actor } => write!(f, "{} can't act.", actor),
            BattleEvent::NoEffect { actor, command } => {
                write!(f, "{}'s {} has no effect yet.", actor, command)
            }
            BattleEvent::RoundSummary { round, party } => {
                write!(f, "Round {}:", round)?;
                for (i, unit) in party.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{} {}/{}", sep, unit.name, unit.health, unit.max_health)?;
                }
                Ok(())
            }
            BattleEvent::Ended { outcome } => match outcome {
                Outcome::Victory => write!(f, "Victory!"),
                Outcome::Defeat => write!(f, "Party wiped..."),
                Outcome::Escaped => write!(f, "The party escaped."),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_message() {
        let event = BattleEvent::Hit {
            attacker: "Fighter".into(),
            defender: "Imp".into(),
            damage: 8,
            critical: false,
            defender_health: 10,
        };
        assert_eq!(event.to_string(), "Fighter hits Imp for 8.");
        assert!(event.is_damage());
    }

    #[test]
    fn critical_hit_message() {
        let event = BattleEvent::Hit {
            attacker: "Wolf".into(),
            defender: "Thief".into(),
            damage: 6,
            critical: true,
            defender_health: 22,
        };
        assert_eq!(event.to_string(), "Wolf hits Thief for 6. Critical hit!");
    }

    #[test]
    fn choice_and_flee_messages() {
        let chose = BattleEvent::Chose {
            actor: "Thief".into(),
            command: CommandKind::Run,
        };
        assert_eq!(chose.to_string(), "Thief chooses Run.");
        assert_eq!(BattleEvent::Fled.to_string(), "Party ran away!");
        assert_eq!(BattleEvent::FleeFailed.to_string(), "Couldn't run!");
    }

    #[test]
    fn round_summary_lists_party() {
        let event = BattleEvent::RoundSummary {
            round: 2,
            party: vec![
                UnitSnapshot {
                    name: "Fighter".into(),
                    health: 30,
                    max_health: 36,
                    alive: true,
                },
                UnitSnapshot {
                    name: "Thief".into(),
                    health: 0,
                    max_health: 28,
                    alive: false,
                },
            ],
        };
        assert_eq!(event.to_string(), "Round 2: Fighter 30/36, Thief 0/28");
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_string(&BattleEvent::Ended {
            outcome: Outcome::Escaped,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"ended","outcome":"escaped"}"#);
    }
}
