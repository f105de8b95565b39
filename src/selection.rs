//! Selection phase.
//!
//! Walks the party roster in slot order, collecting one command per living
//! member. Once the last living member has chosen, selection closes and the
//! queued plan is handed to the round resolver.

use std::mem;

use serde::Serialize;

use crate::roster::{Action, CommandKind, Unit};

/// Why a submitted choice was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The battle has not been started.
    NotStarted,
    /// Selection is closed while the round resolves.
    Resolving,
    /// The battle has already ended.
    BattleOver,
    /// The host has paused input.
    Paused,
}

impl IgnoreReason {
    pub const fn label(self) -> &'static str {
        match self {
            IgnoreReason::NotStarted => "not_started",
            IgnoreReason::Resolving => "resolving",
            IgnoreReason::BattleOver => "battle_over",
            IgnoreReason::Paused => "paused",
        }
    }
}

/// Result of a single submission to the selection controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStep {
    /// The choice was queued and `next_actor` chooses next.
    Queued { next_actor: usize },
    /// The choice was queued and every living member has now chosen.
    Closed,
    Ignored(IgnoreReason),
}

/// Everything the party queued for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPlan {
    pub actions: Vec<Action>,
    pub run_requested: bool,
}

/// Tracks whose turn it is to choose.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: usize,
    interactable: bool,
    open: bool,
    plan: RoundPlan,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh selection phase. Closes at once if nobody in the party is alive.
    pub fn begin(&mut self, party: &[Unit]) {
        self.current = 0;
        self.plan = RoundPlan::default();
        self.open = true;
        self.advance_to_next_living_actor(party);
        if !self.interactable {
            self.open = false;
        }
    }

    /// Skips dead slots starting from the current one.
    pub fn advance_to_next_living_actor(&mut self, party: &[Unit]) {
        while party.get(self.current).is_some_and(Unit::is_dead) {
            self.current += 1;
        }
        self.interactable = self.current < party.len();
    }

    /// Queues a command for the current actor.
    ///
    /// `target` is clamped into the enemy roster; it is ignored for `Run`.
    pub fn submit(
        &mut self,
        party: &[Unit],
        enemy_count: usize,
        command: CommandKind,
        target: usize,
    ) -> SelectionStep {
        if !self.open || self.current >= party.len() {
            return SelectionStep::Ignored(IgnoreReason::Resolving);
        }

        let target = target.min(enemy_count.saturating_sub(1));
        self.plan.actions.push(Action::party(self.current, command, target));
        if command == CommandKind::Run {
            self.plan.run_requested = true;
        }

        self.current += 1;
        self.advance_to_next_living_actor(party);
        if self.interactable {
            SelectionStep::Queued {
                next_actor: self.current,
            }
        } else {
            self.open = false;
            SelectionStep::Closed
        }
    }

    /// Slot of the member currently choosing, if selection is open.
    pub fn current_actor(&self) -> Option<usize> {
        (self.open && self.interactable).then_some(self.current)
    }

    pub fn is_interactable(&self) -> bool {
        self.open && self.interactable
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hands over the queued plan, leaving an empty one behind.
    pub fn take_plan(&mut self) -> RoundPlan {
        mem::take(&mut self.plan)
    }

    /// Closes selection without resolving, e.g. when the battle ends.
    pub fn close(&mut self) {
        self.open = false;
        self.interactable = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> Vec<Unit> {
        vec![
            Unit::new("Fighter", 36, 10, 6),
            Unit::new("Thief", 28, 8, 5),
            Unit::new("W. Mage", 24, 5, 4),
        ]
    }

    #[test]
    fn walks_living_members_in_order() {
        let party = party();
        let mut sel = Selection::new();
        sel.begin(&party);
        assert_eq!(sel.current_actor(), Some(0));
        assert_eq!(
            sel.submit(&party, 3, CommandKind::Fight, 1),
            SelectionStep::Queued { next_actor: 1 }
        );
        assert_eq!(
            sel.submit(&party, 3, CommandKind::Fight, 2),
            SelectionStep::Queued { next_actor: 2 }
        );
        assert_eq!(sel.submit(&party, 3, CommandKind::Magic, 0), SelectionStep::Closed);
        assert!(!sel.is_interactable());

        let plan = sel.take_plan();
        assert_eq!(plan.actions.len(), 3);
        assert!(!plan.run_requested);
        assert_eq!(plan.actions[1].target, Some(2));
    }

    #[test]
    fn skips_dead_members() {
        let mut party = party();
        party[0].take_damage(100);
        party[2].take_damage(100);
        let mut sel = Selection::new();
        sel.begin(&party);
        assert_eq!(sel.current_actor(), Some(1));
        assert_eq!(sel.submit(&party, 2, CommandKind::Run, 0), SelectionStep::Closed);
        let plan = sel.take_plan();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].actor, 1);
        assert!(plan.run_requested);
        assert_eq!(plan.actions[0].target, None);
    }

    #[test]
    fn target_is_clamped() {
        let party = party();
        let mut sel = Selection::new();
        sel.begin(&party);
        sel.submit(&party, 3, CommandKind::Fight, 17);
        assert_eq!(sel.take_plan().actions[0].target, Some(2));
    }

    #[test]
    fn wiped_party_closes_immediately() {
        let mut party = party();
        for unit in &mut party {
            unit.take_damage(100);
        }
        let mut sel = Selection::new();
        sel.begin(&party);
        assert!(!sel.is_open());
        assert_eq!(sel.current_actor(), None);
        assert_eq!(
            sel.submit(&party, 3, CommandKind::Fight, 0),
            SelectionStep::Ignored(IgnoreReason::Resolving)
        );
        assert!(sel.take_plan().actions.is_empty());
    }

    #[test]
    fn empty_party_closes_immediately() {
        let mut sel = Selection::new();
        sel.begin(&[]);
        assert!(!sel.is_open());
        assert!(!sel.is_interactable());
    }

    #[test]
    fn submissions_after_close_are_ignored() {
        let party = vec![Unit::new("Fighter", 36, 10, 6)];
        let mut sel = Selection::new();
        sel.begin(&party);
        assert_eq!(sel.submit(&party, 1, CommandKind::Fight, 0), SelectionStep::Closed);
        assert_eq!(
            sel.submit(&party, 1, CommandKind::Fight, 0),
            SelectionStep::Ignored(IgnoreReason::Resolving)
        );
        assert_eq!(sel.take_plan().actions.len(), 1);
    }
}
