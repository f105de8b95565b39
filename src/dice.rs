//! Randomness seam for combat resolution.
//!
//! Every random decision in a battle goes through [`Dice`], so a battle is
//! fully reproducible from its seed, and tests can script exact outcomes.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the three kinds of roll the resolver makes.
pub trait Dice {
    /// Returns true iff a uniform draw from `[0, 1)` is below `probability`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform integer in `low..=high`.
    fn roll_between(&mut self, low: i64, high: i64) -> i64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// [`Dice`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R = SmallRng> {
    rng: R,
}

impl RandomDice<SmallRng> {
    /// Seeded dice. A seed of 0 draws from entropy instead.
    pub fn seeded(seed: u64) -> Self {
        if seed != 0 {
            RandomDice::new(SmallRng::seed_from_u64(seed))
        } else {
            RandomDice::from_entropy()
        }
    }

    pub fn from_entropy() -> Self {
        RandomDice::new(SmallRng::from_entropy())
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        RandomDice { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn roll_between(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// [`Dice`] that replays queued outcomes.
///
/// Each roll kind has its own queue. Once a queue runs dry the dice fall back
/// to the quiet outcome: `chance` fails, `roll_between` gives the midpoint,
/// and `pick` gives index 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    chances: VecDeque<bool>,
    rolls: VecDeque<i64>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues outcomes for `chance` calls, in order.
    pub fn with_chances(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(outcomes);
        self
    }

    /// Queues results for `roll_between`. Values outside the requested range are clamped.
    pub fn with_rolls(mut self, values: impl IntoIterator<Item = i64>) -> Self {
        self.rolls.extend(values);
        self
    }

    /// Queues indices for `pick`. Values past the end are clamped to the last index.
    pub fn with_picks(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(indices);
        self
    }

    /// True when every queued outcome has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.chances.is_empty() && self.rolls.is_empty() && self.picks.is_empty()
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn roll_between(&mut self, low: i64, high: i64) -> i64 {
        match self.rolls.pop_front() {
            Some(v) => v.clamp(low, high.max(low)),
            None => {
                let (low, high) = (i128::from(low), i128::from(high));
                (low + (high - low) / 2) as i64
            }
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        self.picks.pop_front().map_or(0, |i| i.min(last))
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn roll_between(&mut self, low: i64, high: i64) -> i64 {
        (**self).roll_between(low, high)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}
