//! Round resolution.
//!
//! Consumes one round's queued party actions and resolves them, then lets
//! every living enemy attack, then decides whether the battle goes on. The
//! result is a list of steps for the host to play back.

use tracing::debug;

use super::damage::resolve_attack;
use super::phase::RoundPhase;
use crate::config::BattleConfig;
use crate::dice::Dice;
use crate::event::{BattleEvent, Outcome};
use crate::roster::{Action, CommandKind, Rosters, Side, UnitSnapshot};
use crate::selection::RoundPlan;

/// Both rosters as they stood right after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    pub party: Vec<UnitSnapshot>,
    pub enemies: Vec<UnitSnapshot>,
}

impl RosterSnapshot {
    pub fn capture(rosters: &Rosters) -> Self {
        RosterSnapshot {
            party: rosters.snapshots(Side::Party),
            enemies: rosters.snapshots(Side::Enemy),
        }
    }
}

/// One event, plus the rosters after it when it changed health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStep {
    pub event: BattleEvent,
    pub snapshot: Option<RosterSnapshot>,
}

/// How a round left the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Continue,
    Ended(Outcome),
}

/// Everything that happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub steps: Vec<ResolvedStep>,
    pub result: RoundResult,
}

impl RoundReport {
    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.steps.iter().map(|s| &s.event)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.result {
            RoundResult::Continue => None,
            RoundResult::Ended(outcome) => Some(outcome),
        }
    }
}

/// Resolves a full round against the rosters.
pub fn resolve_round<D: Dice + ?Sized>(
    rosters: &mut Rosters,
    plan: &RoundPlan,
    round: u32,
    config: &BattleConfig,
    dice: &mut D,
) -> RoundReport {
    RoundResolver::new(rosters, round, config, dice).run(plan)
}

/// Per-round state machine.
pub struct RoundResolver<'a, D: ?Sized> {
    rosters: &'a mut Rosters,
    config: &'a BattleConfig,
    dice: &'a mut D,
    round: u32,
    flee_resolved: bool,
    steps: Vec<ResolvedStep>,
}

impl<'a, D: Dice + ?Sized> RoundResolver<'a, D> {
    pub fn new(
        rosters: &'a mut Rosters,
        round: u32,
        config: &'a BattleConfig,
        dice: &'a mut D,
    ) -> Self {
        RoundResolver {
            rosters,
            config,
            dice,
            round,
            flee_resolved: false,
            steps: Vec::new(),
        }
    }

    /// Walks every phase and returns the report.
    pub fn run(mut self, plan: &RoundPlan) -> RoundReport {
        let mut phase = Some(RoundPhase::FIRST);
        let mut result = RoundResult::Continue;

        while let Some(current) = phase {
            debug!(round = self.round, phase = ?current, "entering phase");
            match current {
                RoundPhase::RunCheck => {
                    if self.run_check(plan) {
                        result = RoundResult::Ended(Outcome::Escaped);
                        self.emit(BattleEvent::Ended {
                            outcome: Outcome::Escaped,
                        });
                        break;
                    }
                }
                RoundPhase::PlayerActions => self.player_actions(plan),
                RoundPhase::EnemyActions => self.enemy_actions(),
                RoundPhase::RoundEnd => result = self.round_end(),
            }
            phase = current.next();
        }

        RoundReport {
            round: self.round,
            steps: self.steps,
            result,
        }
    }

    /// Rolls the shared flee attempt once if anyone chose Run.
    /// Returns true when the party got away.
    fn run_check(&mut self, plan: &RoundPlan) -> bool {
        let wants_out = plan.run_requested
            || plan.actions.iter().any(|a| a.command == CommandKind::Run);
        if !wants_out || self.flee_resolved {
            return false;
        }
        self.flee_resolved = true;

        if self.dice.chance(self.config.flee_chance) {
            debug!(round = self.round, "flee succeeded");
            self.emit(BattleEvent::Fled);
            true
        } else {
            debug!(round = self.round, "flee failed");
            self.emit(BattleEvent::FleeFailed);
            false
        }
    }

    fn player_actions(&mut self, plan: &RoundPlan) {
        for action in &plan.actions {
            if !self.rosters.both_standing() {
                break;
            }
            self.resolve_action(*action);
        }
    }

    fn enemy_actions(&mut self) {
        for actor in 0..self.rosters.enemies.len() {
            if !self.rosters.both_standing() {
                break;
            }
            if !self.rosters.is_alive(Side::Enemy, actor) {
                continue;
            }
            let living = self.rosters.living(Side::Party);
            if living.is_empty() {
                break;
            }
            let target = living[self.dice.pick(living.len())];
            self.resolve_action(Action::enemy_attack(actor, target));
        }
    }

    fn round_end(&mut self) -> RoundResult {
        let event = BattleEvent::RoundSummary {
            round: self.round,
            party: self.rosters.snapshots(Side::Party),
        };
        let snapshot = RosterSnapshot::capture(self.rosters);
        self.steps.push(ResolvedStep {
            event,
            snapshot: Some(snapshot),
        });

        let outcome = if self.rosters.all_dead(Side::Enemy) {
            Outcome::Victory
        } else if self.rosters.all_dead(Side::Party) {
            Outcome::Defeat
        } else {
            return RoundResult::Continue;
        };
        self.emit(BattleEvent::Ended { outcome });
        RoundResult::Ended(outcome)
    }

    fn resolve_action(&mut self, action: Action) {
        let Some(actor) = self.rosters.unit(action.side, action.actor) else {
            return;
        };
        if actor.is_dead() {
            debug!(?action, "actor is down, skipping");
            return;
        }
        let actor_name = actor.name().to_string();

        match action.command {
            // Only reachable after a failed flee: a successful one ends the round first.
            CommandKind::Run => self.emit(BattleEvent::Forfeited { actor: actor_name }),
            CommandKind::Magic | CommandKind::Item => self.emit(BattleEvent::NoEffect {
                actor: actor_name,
                command: action.command,
            }),
            CommandKind::Fight => self.resolve_fight(action, actor_name),
        }
    }

    fn resolve_fight(&mut self, action: Action, actor_name: String) {
        let defender_side = action.side.opponent();
        let target = action
            .target
            .filter(|&t| self.rosters.is_alive(defender_side, t))
            .or_else(|| self.rosters.first_living(defender_side));

        let Some(target) = target else {
            self.emit(BattleEvent::Ineffective { actor: actor_name });
            return;
        };
        if action.target != Some(target) {
            debug!(?action, new_target = target, "retargeted");
        }

        let Some((attacker, defender)) = self.rosters.pair_mut(action.side, action.actor, target)
        else {
            return;
        };
        let roll = resolve_attack(attacker, defender, self.config, self.dice);
        debug!(
            attacker = attacker.name(),
            defender = defender.name(),
            damage = roll.amount,
            critical = roll.critical,
            "hit"
        );
        let event = BattleEvent::Hit {
            attacker: actor_name,
            defender: defender.name().to_string(),
            damage: roll.amount,
            critical: roll.critical,
            defender_health: defender.health(),
        };
        let snapshot = RosterSnapshot::capture(self.rosters);
        self.steps.push(ResolvedStep {
            event,
            snapshot: Some(snapshot),
        });
    }

    fn emit(&mut self, event: BattleEvent) {
        self.steps.push(ResolvedStep {
            event,
            snapshot: None,
        });
    }
}
