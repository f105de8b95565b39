use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish::config::BattleConfig;
use skirmish::resolve::{resolve_round, roll_damage};
use skirmish::roster::{Action, CommandKind};
use skirmish::selection::RoundPlan;
use skirmish::simulate::{play_battle, SimulationConfig};
use skirmish::{BattleSetup, RandomDice};

fn bench_roll_damage(c: &mut Criterion) {
    let config = BattleConfig::default();
    let mut dice = RandomDice::seeded(1);
    c.bench_function("roll_damage", |b| {
        b.iter(|| roll_damage(black_box(10), black_box(2), &config, &mut dice))
    });
}

fn bench_resolve_round(c: &mut Criterion) {
    let setup = BattleSetup::default();
    let plan = RoundPlan {
        actions: (0..4)
            .map(|i| Action::party(i, CommandKind::Fight, 2))
            .collect(),
        run_requested: false,
    };
    c.bench_function("resolve_round_default_setup", |b| {
        let mut dice = RandomDice::seeded(7);
        b.iter(|| {
            let mut rosters = setup.rosters();
            resolve_round(&mut rosters, black_box(&plan), 1, &setup.config, &mut dice)
        })
    });
}

fn bench_full_battle(c: &mut Criterion) {
    let setup = BattleSetup::default();
    let config = SimulationConfig {
        seed: 99,
        ..SimulationConfig::default()
    };
    c.bench_function("play_battle_default_setup", |b| {
        let mut seed = 1u64;
        b.iter(|| {
            seed += 1;
            play_battle(&setup, &config, 0, black_box(seed))
        })
    });
}

criterion_group!(benches, bench_roll_damage, bench_resolve_round, bench_full_battle);
criterion_main!(benches);
