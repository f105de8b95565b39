//! Combatant data.
//!
//! A unit is one member of either roster. Dead units keep their roster slot
//! and are skipped by selection and targeting.

use serde::{Deserialize, Serialize};

/// Which roster a unit or action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Party,
    Enemy,
}

impl Side {
    /// Returns the opposing side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Party => Side::Enemy,
            Side::Enemy => Side::Party,
        }
    }

    /// Returns the lowercase label used in protocol output.
    pub const fn label(self) -> &'static str {
        match self {
            Side::Party => "party",
            Side::Enemy => "enemy",
        }
    }
}

/// A single combatant.
///
/// `health` is kept in `0..=max_health`; the fields are private so the only
/// way to lower it is [`Unit::take_damage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    name: String,
    max_health: u32,
    health: u32,
    attack: u32,
    defense: u32,
}

impl Unit {
    /// Creates a unit at full health.
    pub fn new(name: impl Into<String>, max_health: u32, attack: u32, defense: u32) -> Self {
        Unit {
            name: name.into(),
            max_health,
            health: max_health,
            attack,
            defense,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Lowers health by `amount`, flooring at zero. Returns the new health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }
}

/// Point-in-time view of a unit for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
}

impl UnitSnapshot {
    /// Formats the HUD line, e.g. `Fighter  HP 30/36`.
    pub fn hud_line(&self) -> String {
        format!("{}  HP {}/{}", self.name, self.health, self.max_health)
    }
}

impl From<&Unit> for UnitSnapshot {
    fn from(unit: &Unit) -> Self {
        UnitSnapshot {
            name: unit.name.clone(),
            health: unit.health,
            max_health: unit.max_health,
            alive: unit.is_alive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_unit_starts_at_full_health() {
        let unit = Unit::new("Fighter", 36, 10, 6);
        assert_eq!(unit.health(), 36);
        assert_eq!(unit.max_health(), 36);
        assert!(unit.is_alive());
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut unit = Unit::new("Imp", 18, 6, 2);
        assert_eq!(unit.take_damage(7), 11);
        assert_eq!(unit.take_damage(50), 0);
        assert!(unit.is_dead());
        assert_eq!(unit.take_damage(3), 0);
    }

    #[test]
    fn side_opponent() {
        assert_eq!(Side::Party.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Party);
    }

    #[test]
    fn snapshot_hud_line() {
        let mut unit = Unit::new("Wolf", 34, 9, 4);
        unit.take_damage(4);
        let snap = UnitSnapshot::from(&unit);
        assert_eq!(snap.hud_line(), "Wolf  HP 30/34");
        assert!(snap.alive);
    }
}
