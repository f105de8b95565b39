//! Damage model.
//!
//! Damage is `attack - defense` floored at 1, spread by a symmetric integer
//! roll, optionally multiplied by a critical hit, and floored at 1 again.
//! Rounding is half-to-even throughout.

use crate::config::BattleConfig;
use crate::dice::Dice;
use crate::roster::Unit;

/// Breakdown of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    /// `max(1, attack - defense)`.
    pub base: i64,
    /// Half-width of the variance roll.
    pub variance: i64,
    /// Damage after variance, before the critical multiplier.
    pub pre_crit: i64,
    pub critical: bool,
    /// Final damage. Always at least 1.
    pub amount: u32,
}

/// Base damage before variance.
pub fn base_damage(attack: u32, defense: u32) -> i64 {
    (i64::from(attack) - i64::from(defense)).max(1)
}

/// Half-width of the variance roll for a given base.
pub fn variance_for(base: i64, ratio: f64) -> i64 {
    ((base as f64 * ratio).round_ties_even() as i64).max(1)
}

/// Rolls damage for an attack without applying it.
pub fn roll_damage<D: Dice + ?Sized>(
    attack: u32,
    defense: u32,
    config: &BattleConfig,
    dice: &mut D,
) -> DamageRoll {
    let base = base_damage(attack, defense);
    let variance = variance_for(base, config.variance_ratio);
    let pre_crit = base.saturating_add(dice.roll_between(-variance, variance));

    let critical = dice.chance(config.crit_chance);
    let damage = if critical {
        (pre_crit as f64 * config.crit_multiplier).round_ties_even() as i64
    } else {
        pre_crit
    };

    DamageRoll {
        base,
        variance,
        pre_crit,
        critical,
        amount: u32::try_from(damage.max(1)).unwrap_or(u32::MAX),
    }
}

/// Rolls damage for `attacker` hitting `defender` and applies it.
pub fn resolve_attack<D: Dice + ?Sized>(
    attacker: &Unit,
    defender: &mut Unit,
    config: &BattleConfig,
    dice: &mut D,
) -> DamageRoll {
    let roll = roll_damage(attacker.attack(), defender.defense(), config, dice);
    defender.take_damage(roll.amount);
    roll
}
