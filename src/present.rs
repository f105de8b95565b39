//! Collaborator contracts for whatever hosts a battle.

use crate::event::{BattleEvent, Outcome};
use crate::roster::UnitSnapshot;

/// Receives the event stream and roster snapshots.
///
/// Each logged event replaces the previously displayed message.
pub trait Presenter {
    fn log(&mut self, event: &BattleEvent);
    fn snapshot(&mut self, party: &[UnitSnapshot], enemies: &[UnitSnapshot]);
}

/// Told exactly once when a battle ends.
pub trait Host {
    fn battle_ended(&mut self, outcome: Outcome);
}

/// Records everything a battle reports. Useful for replays and tests.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub events: Vec<BattleEvent>,
    pub party: Vec<UnitSnapshot>,
    pub enemies: Vec<UnitSnapshot>,
    pub snapshots_taken: usize,
    pub outcome: Option<Outcome>,
    pub end_notifications: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message currently on display.
    pub fn latest_message(&self) -> Option<String> {
        self.events.last().map(ToString::to_string)
    }

    pub fn damage_events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(|e| e.is_damage())
    }

    pub fn count(&self, pred: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Presenter for Transcript {
    fn log(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }

    fn snapshot(&mut self, party: &[UnitSnapshot], enemies: &[UnitSnapshot]) {
        self.party = party.to_vec();
        self.enemies = enemies.to_vec();
        self.snapshots_taken += 1;
    }
}

impl Host for Transcript {
    fn battle_ended(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.end_notifications += 1;
    }
}
