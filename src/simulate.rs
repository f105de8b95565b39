//! Batch battle simulation.
//!
//! Plays many complete battles with an autopilot choosing for the party and
//! records how each one ended. Used for balance checks on a setup.

use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::battle::{Battle, Submission};
use crate::config::BattleSetup;
use crate::dice::{Dice, RandomDice};
use crate::event::{BattleEvent, Outcome};
use crate::present::Transcript;
use crate::roster::{CommandKind, Side};

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of battles to play.
    pub battles: usize,
    /// Worker threads. 1 or less plays battles sequentially.
    pub threads: usize,
    /// Base seed (0 = entropy). Battle `i` uses `seed + i`.
    pub seed: u64,
    /// Rounds after which an undecided battle is abandoned.
    pub max_rounds: u32,
    /// The party runs once its total health drops below this fraction of
    /// its maximum. `None` never runs.
    pub run_when_below: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            battles: 100,
            threads: 4,
            seed: 0,
            max_rounds: 100,
            run_when_below: None,
        }
    }
}

/// How a simulated battle finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimOutcome {
    Victory,
    Defeat,
    Escaped,
    /// Hit `max_rounds` without a result.
    Stalemate,
}

impl From<Outcome> for SimOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Victory => SimOutcome::Victory,
            Outcome::Defeat => SimOutcome::Defeat,
            Outcome::Escaped => SimOutcome::Escaped,
        }
    }
}

/// Result of one simulated battle.
#[derive(Debug, Clone, Serialize)]
pub struct BattleRecord {
    pub battle_id: usize,
    pub outcome: SimOutcome,
    pub rounds: u32,
    /// Remaining health of each party member, in roster order.
    pub party_health: Vec<u32>,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub critical_hits: usize,
    pub flee_attempts: usize,
}

/// Outcome counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub victories: usize,
    pub defeats: usize,
    pub escapes: usize,
    pub stalemates: usize,
}

impl Summary {
    pub fn tally(records: &[BattleRecord]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            match record.outcome {
                SimOutcome::Victory => summary.victories += 1,
                SimOutcome::Defeat => summary.defeats += 1,
                SimOutcome::Escaped => summary.escapes += 1,
                SimOutcome::Stalemate => summary.stalemates += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.victories + self.defeats + self.escapes + self.stalemates
    }
}

/// Picks the party's choices: fight a random living enemy, or run when the
/// party is hurt past the configured threshold.
struct Autopilot {
    dice: RandomDice,
    run_when_below: Option<f64>,
}

impl Autopilot {
    fn choose<D: Dice>(&mut self, battle: &Battle<D>) -> (CommandKind, usize) {
        let rosters = battle.rosters();
        if let Some(threshold) = self.run_when_below {
            let (health, max) = rosters.party.iter().fold((0u64, 0u64), |(h, m), u| {
                (h + u64::from(u.health()), m + u64::from(u.max_health()))
            });
            if max > 0 && (health as f64) < threshold * max as f64 {
                return (CommandKind::Run, 0);
            }
        }
        let living = rosters.living(Side::Enemy);
        if living.is_empty() {
            return (CommandKind::Fight, 0);
        }
        (CommandKind::Fight, living[self.dice.pick(living.len())])
    }
}

/// Plays one battle to completion.
pub fn play_battle(
    setup: &BattleSetup,
    config: &SimulationConfig,
    battle_id: usize,
    seed: u64,
) -> BattleRecord {
    let mut battle = Battle::new(setup, RandomDice::seeded(seed));
    let mut autopilot = Autopilot {
        dice: RandomDice::seeded(if seed == 0 { 0 } else { seed ^ 0x9E37_79B9_7F4A_7C15 }),
        run_when_below: config.run_when_below,
    };
    let mut transcript = Transcript::new();
    let mut host = Transcript::new();

    battle.start(&mut transcript, &mut host);
    while !battle.is_over() && battle.round() <= config.max_rounds {
        let (command, target) = autopilot.choose(&battle);
        if let Submission::Ignored(_) =
            battle.submit_choice(command, target, &mut transcript, &mut host)
        {
            break;
        }
    }

    let rosters = battle.rosters();
    let lost = |side: Side| -> u64 {
        rosters
            .side(side)
            .iter()
            .map(|u| u64::from(u.max_health() - u.health()))
            .sum()
    };

    BattleRecord {
        battle_id,
        outcome: battle
            .outcome()
            .map_or(SimOutcome::Stalemate, SimOutcome::from),
        rounds: battle.round().min(config.max_rounds),
        party_health: rosters.party.iter().map(|u| u.health()).collect(),
        damage_dealt: lost(Side::Enemy),
        damage_taken: lost(Side::Party),
        critical_hits: transcript
            .count(|e| matches!(e, BattleEvent::Hit { critical: true, .. })),
        flee_attempts: transcript
            .count(|e| matches!(e, BattleEvent::Fled | BattleEvent::FleeFailed)),
    }
}

fn battle_seed(config: &SimulationConfig, index: usize) -> u64 {
    if config.seed == 0 {
        0
    } else {
        config.seed.wrapping_add(index as u64)
    }
}

/// Plays every battle in the batch, in parallel when `threads > 1`.
/// Records come back in battle order either way.
pub fn run_simulation(
    setup: &BattleSetup,
    config: &SimulationConfig,
) -> Result<Vec<BattleRecord>, rayon::ThreadPoolBuildError> {
    let start = Instant::now();
    let records = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            (0..config.battles)
                .into_par_iter()
                .map(|i| play_battle(setup, config, i, battle_seed(config, i)))
                .collect()
        })
    } else {
        (0..config.battles)
            .map(|i| play_battle(setup, config, i, battle_seed(config, i)))
            .collect()
    };
    info!(
        battles = config.battles,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation finished"
    );
    Ok(records)
}

/// Writes records as JSONL, one battle per line.
pub fn write_jsonl<W: Write>(records: &[BattleRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints outcome counts to stderr.
pub fn print_summary(records: &[BattleRecord]) {
    let summary = Summary::tally(records);
    let total = summary.total().max(1) as f64;
    let pct = |n: usize| n as f64 * 100.0 / total;
    eprintln!(
        "Victories: {} ({:.1}%)  Defeats: {} ({:.1}%)  Escapes: {} ({:.1}%)  Stalemates: {}",
        summary.victories,
        pct(summary.victories),
        summary.defeats,
        pct(summary.defeats),
        summary.escapes,
        pct(summary.escapes),
        summary.stalemates,
    );
    if !records.is_empty() {
        let rounds: u64 = records.iter().map(|r| u64::from(r.rounds)).sum();
        eprintln!("Average rounds: {:.2}", rounds as f64 / records.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BattleConfig, UnitSpec};

    fn seeded(battles: usize, threads: usize) -> SimulationConfig {
        SimulationConfig {
            battles,
            threads,
            seed: 1234,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn every_battle_finishes() {
        let records = run_simulation(&BattleSetup::default(), &seeded(20, 1)).unwrap();
        assert_eq!(records.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.battle_id, i);
            assert_ne!(record.outcome, SimOutcome::Stalemate);
            assert_ne!(record.outcome, SimOutcome::Escaped);
            assert!(record.rounds >= 1);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let setup = BattleSetup::default();
        let seq = run_simulation(&setup, &seeded(12, 1)).unwrap();
        let par = run_simulation(&setup, &seeded(12, 3)).unwrap();
        let outcomes = |r: &[BattleRecord]| -> Vec<(SimOutcome, u32, Vec<u32>)> {
            r.iter()
                .map(|b| (b.outcome, b.rounds, b.party_health.clone()))
                .collect()
        };
        assert_eq!(outcomes(&seq), outcomes(&par));
    }

    #[test]
    fn always_running_with_certain_flee_escapes() {
        let mut setup = BattleSetup::default();
        setup.config = BattleConfig {
            flee_chance: 1.0,
            ..BattleConfig::default()
        };
        let config = SimulationConfig {
            run_when_below: Some(2.0),
            ..seeded(5, 1)
        };
        let records = run_simulation(&setup, &config).unwrap();
        for record in &records {
            assert_eq!(record.outcome, SimOutcome::Escaped);
            assert_eq!(record.damage_taken, 0);
            assert_eq!(record.flee_attempts, 1);
        }
    }

    #[test]
    fn unwinnable_battle_is_a_stalemate() {
        let setup = BattleSetup {
            party: vec![UnitSpec::new("Knight", 1000, 0, 100)],
            enemies: vec![UnitSpec::new("Slime", 1000, 0, 100)],
            config: BattleConfig::default(),
        };
        let config = SimulationConfig {
            max_rounds: 5,
            ..seeded(1, 1)
        };
        let records = run_simulation(&setup, &config).unwrap();
        assert_eq!(records[0].outcome, SimOutcome::Stalemate);
        assert_eq!(records[0].rounds, 5);
    }

    #[test]
    fn huge_health_totals_do_not_overflow() {
        let setup = BattleSetup {
            party: vec![
                UnitSpec::new("Titan", 3_000_000_000, 100, 0),
                UnitSpec::new("Colossus", 3_000_000_000, 100, 0),
            ],
            enemies: vec![UnitSpec::new("Imp", 18, 6, 2)],
            config: BattleConfig::default(),
        };
        setup.validate().unwrap();
        let config = SimulationConfig {
            run_when_below: Some(0.5),
            ..seeded(3, 1)
        };
        for record in run_simulation(&setup, &config).unwrap() {
            assert_eq!(record.outcome, SimOutcome::Victory);
            assert_eq!(record.damage_dealt, 18);
            assert_eq!(record.damage_taken, 0);
        }
    }

    #[test]
    fn summary_and_jsonl() {
        let records = run_simulation(&BattleSetup::default(), &seeded(4, 1)).unwrap();
        let summary = Summary::tally(&records);
        assert_eq!(summary.total(), 4);

        let mut out = Vec::new();
        write_jsonl(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["battle_id"], 0);
        assert!(first["outcome"].is_string());
    }
}
