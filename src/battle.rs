//! Battle controller.
//!
//! Owns both rosters for the lifetime of one battle and cycles selection and
//! resolution until one side is wiped or the party escapes.

use tracing::info;

use crate::config::{BattleConfig, BattleSetup};
use crate::dice::Dice;
use crate::event::{BattleEvent, Outcome};
use crate::present::{Host, Presenter};
use crate::resolve::{resolve_round, RosterSnapshot, RoundReport};
use crate::roster::{CommandKind, Rosters, Side, UnitSnapshot};
use crate::selection::{IgnoreReason, Selection, SelectionStep};

/// Where the battle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    /// Created but `start` has not been called.
    Pending,
    /// Waiting for the party member in this slot to choose.
    Selecting { actor: usize },
    /// A round is being resolved.
    Resolving,
    Over(Outcome),
}

/// What happened to a submitted choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Queued; `next_actor` chooses next.
    Queued { next_actor: usize },
    /// Queued as the last choice of the round, and the round was resolved.
    RoundResolved(RoundReport),
    Ignored(IgnoreReason),
}

/// A single battle between the party and one enemy group.
pub struct Battle<D> {
    rosters: Rosters,
    config: BattleConfig,
    dice: D,
    selection: Selection,
    round: u32,
    status: BattleStatus,
}

impl<D: Dice> Battle<D> {
    /// Creates a battle from a setup with fresh full-health rosters.
    pub fn new(setup: &BattleSetup, dice: D) -> Self {
        Self::with_rosters(setup.rosters(), setup.config, dice)
    }

    pub fn with_rosters(rosters: Rosters, config: BattleConfig, dice: D) -> Self {
        Battle {
            rosters,
            config,
            dice,
            selection: Selection::new(),
            round: 0,
            status: BattleStatus::Pending,
        }
    }

    /// Announces the battle and opens the first selection phase.
    ///
    /// If the party has nobody standing, the first round resolves at once.
    /// Calling this again after the battle started does nothing.
    pub fn start<P, H>(&mut self, view: &mut P, host: &mut H) -> Option<RoundReport>
    where
        P: Presenter + ?Sized,
        H: Host + ?Sized,
    {
        if self.status != BattleStatus::Pending {
            return None;
        }
        info!(
            party = self.rosters.party.len(),
            enemies = self.rosters.enemies.len(),
            "battle started"
        );
        view.log(&BattleEvent::BattleStarted);
        self.show(view);
        self.open_selection(view, host)
    }

    /// Queues a command for the party member currently choosing.
    ///
    /// When that was the last living member, the round resolves before this
    /// returns and every resulting step has already been sent to `view`.
    pub fn submit_choice<P, H>(
        &mut self,
        command: CommandKind,
        target: usize,
        view: &mut P,
        host: &mut H,
    ) -> Submission
    where
        P: Presenter + ?Sized,
        H: Host + ?Sized,
    {
        match self.status {
            BattleStatus::Over(_) => return Submission::Ignored(IgnoreReason::BattleOver),
            BattleStatus::Pending => return Submission::Ignored(IgnoreReason::NotStarted),
            BattleStatus::Resolving => return Submission::Ignored(IgnoreReason::Resolving),
            BattleStatus::Selecting { .. } => {}
        }

        let actor = self.selection.current_actor();
        let step = self.selection.submit(
            &self.rosters.party,
            self.rosters.enemies.len(),
            command,
            target,
        );
        if let (Some(actor), SelectionStep::Queued { .. } | SelectionStep::Closed) = (actor, step)
        {
            if let Some(unit) = self.rosters.unit(Side::Party, actor) {
                view.log(&BattleEvent::Chose {
                    actor: unit.name().to_string(),
                    command,
                });
            }
        }

        match step {
            SelectionStep::Queued { next_actor } => {
                self.status = BattleStatus::Selecting { actor: next_actor };
                Submission::Queued { next_actor }
            }
            SelectionStep::Closed => Submission::RoundResolved(self.resolve(view, host)),
            SelectionStep::Ignored(reason) => Submission::Ignored(reason),
        }
    }

    /// Resets round state and opens selection, resolving immediately when
    /// nobody in the party can choose.
    fn open_selection<P, H>(&mut self, view: &mut P, host: &mut H) -> Option<RoundReport>
    where
        P: Presenter + ?Sized,
        H: Host + ?Sized,
    {
        self.round += 1;
        self.selection.begin(&self.rosters.party);
        match self.selection.current_actor() {
            Some(actor) => {
                self.status = BattleStatus::Selecting { actor };
                None
            }
            None => Some(self.resolve(view, host)),
        }
    }

    /// Runs one round from the closed selection and plays it to the collaborators.
    fn resolve<P, H>(&mut self, view: &mut P, host: &mut H) -> RoundReport
    where
        P: Presenter + ?Sized,
        H: Host + ?Sized,
    {
        self.status = BattleStatus::Resolving;
        let plan = self.selection.take_plan();
        let report = resolve_round(
            &mut self.rosters,
            &plan,
            self.round,
            &self.config,
            &mut self.dice,
        );

        for step in &report.steps {
            view.log(&step.event);
            if let Some(RosterSnapshot { party, enemies }) = &step.snapshot {
                view.snapshot(party, enemies);
            }
        }

        match report.outcome() {
            Some(outcome) => {
                info!(round = self.round, outcome = outcome.label(), "battle ended");
                self.status = BattleStatus::Over(outcome);
                self.selection.close();
                host.battle_ended(outcome);
            }
            None => {
                self.open_selection(view, host);
            }
        }
        report
    }

    fn show<P: Presenter + ?Sized>(&self, view: &mut P) {
        view.snapshot(
            &self.rosters.snapshots(Side::Party),
            &self.rosters.snapshots(Side::Enemy),
        );
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            BattleStatus::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Whether the input surface may submit a choice right now.
    pub fn is_interactable(&self) -> bool {
        matches!(self.status, BattleStatus::Selecting { .. }) && self.selection.is_interactable()
    }

    /// Slot of the party member currently choosing.
    pub fn current_actor(&self) -> Option<usize> {
        match self.status {
            BattleStatus::Selecting { actor } => Some(actor),
            _ => None,
        }
    }

    /// The round being selected or resolved. Zero before `start`.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rosters(&self) -> &Rosters {
        &self.rosters
    }

    pub fn snapshots(&self, side: Side) -> Vec<UnitSnapshot> {
        self.rosters.snapshots(side)
    }
}
