//! Battle configuration.
//!
//! Rosters and tuning constants are supplied as an in-memory [`BattleSetup`],
//! which can also be loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::roster::{Rosters, Unit};

/// Default chance that a party-wide flee attempt succeeds.
pub const DEFAULT_FLEE_CHANCE: f64 = 0.60;
/// Default chance that any single hit is critical.
pub const DEFAULT_CRIT_CHANCE: f64 = 0.05;
/// Default damage multiplier applied on a critical hit.
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;
/// Default spread of the damage roll as a fraction of base damage.
pub const DEFAULT_VARIANCE_RATIO: f64 = 0.2;
/// A variance wider than the base damage itself is rejected.
pub const MAX_VARIANCE_RATIO: f64 = 1.0;

/// Errors that can occur while loading or validating a setup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse setup JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unit '{0}' has zero max health")]
    ZeroHealth(String),
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("{name} is out of range, got {value}")]
    InvalidFactor { name: &'static str, value: f64 },
}

/// Tunable combat constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub flee_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub variance_ratio: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            flee_chance: DEFAULT_FLEE_CHANCE,
            crit_chance: DEFAULT_CRIT_CHANCE,
            crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            variance_ratio: DEFAULT_VARIANCE_RATIO,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("flee_chance", self.flee_chance),
            ("crit_chance", self.crit_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, value, max) in [
            ("crit_multiplier", self.crit_multiplier, f64::MAX),
            ("variance_ratio", self.variance_ratio, MAX_VARIANCE_RATIO),
        ] {
            if !(0.0..=max).contains(&value) {
                return Err(ConfigError::InvalidFactor { name, value });
            }
        }
        Ok(())
    }
}

/// Stats for one unit as written in a setup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
}

impl UnitSpec {
    pub fn new(name: &str, max_health: u32, attack: u32, defense: u32) -> Self {
        UnitSpec {
            name: name.to_string(),
            max_health,
            attack,
            defense,
        }
    }

    fn build(&self) -> Unit {
        Unit::new(self.name.clone(), self.max_health, self.attack, self.defense)
    }
}

/// Initial state of a battle: both rosters and the combat constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    #[serde(default)]
    pub party: Vec<UnitSpec>,
    #[serde(default)]
    pub enemies: Vec<UnitSpec>,
    #[serde(default)]
    pub config: BattleConfig,
}

impl Default for BattleSetup {
    /// Four heroes against two imps and a wolf.
    fn default() -> Self {
        BattleSetup {
            party: vec![
                UnitSpec::new("Fighter", 36, 10, 6),
                UnitSpec::new("Thief", 28, 8, 5),
                UnitSpec::new("W. Mage", 24, 5, 4),
                UnitSpec::new("B. Mage", 22, 4, 3),
            ],
            enemies: vec![
                UnitSpec::new("Imp", 18, 6, 2),
                UnitSpec::new("Imp", 18, 6, 2),
                UnitSpec::new("Wolf", 34, 9, 4),
            ],
            config: BattleConfig::default(),
        }
    }
}

impl BattleSetup {
    /// Checks unit stats and constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(spec) = self
            .party
            .iter()
            .chain(&self.enemies)
            .find(|s| s.max_health == 0)
        {
            return Err(ConfigError::ZeroHealth(spec.name.clone()));
        }
        self.config.validate()
    }

    /// Builds fresh full-health rosters.
    pub fn rosters(&self) -> Rosters {
        Rosters::new(
            self.party.iter().map(UnitSpec::build).collect(),
            self.enemies.iter().map(UnitSpec::build).collect(),
        )
    }
}

/// Loads and validates a setup from a JSON file.
pub fn load_setup(path: &Path) -> Result<BattleSetup, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_setup_from_str(&data)
}

/// Loads and validates a setup from a JSON string.
pub fn load_setup_from_str(json: &str) -> Result<BattleSetup, ConfigError> {
    let setup: BattleSetup = serde_json::from_str(json)?;
    setup.validate()?;
    Ok(setup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_setup_is_valid() {
        let setup = BattleSetup::default();
        assert!(setup.validate().is_ok());
        let rosters = setup.rosters();
        assert_eq!(rosters.party.len(), 4);
        assert_eq!(rosters.enemies.len(), 3);
        assert_eq!(rosters.enemies[2].name(), "Wolf");
    }

    #[test]
    fn parse_setup_with_partial_config() {
        let json = r#"{
            "party": [{"name": "Fighter", "max_health": 36, "attack": 10, "defense": 6}],
            "enemies": [{"name": "Imp", "max_health": 18, "attack": 6, "defense": 2}],
            "config": {"flee_chance": 1.0}
        }"#;
        let setup = load_setup_from_str(json).unwrap();
        assert_eq!(setup.party[0].name, "Fighter");
        assert_eq!(setup.config.flee_chance, 1.0);
        assert_eq!(setup.config.crit_chance, DEFAULT_CRIT_CHANCE);
    }

    #[test]
    fn missing_rosters_default_to_empty() {
        let setup = load_setup_from_str("{}").unwrap();
        assert!(setup.party.is_empty());
        assert!(setup.enemies.is_empty());
        assert_eq!(setup.config, BattleConfig::default());
    }

    #[test]
    fn rejects_zero_health() {
        let json = r#"{"party": [{"name": "Ghost", "max_health": 0, "attack": 1, "defense": 1}]}"#;
        let err = load_setup_from_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroHealth(ref n) if n == "Ghost"));
    }

    #[test]
    fn rejects_bad_probability() {
        let json = r#"{"config": {"crit_chance": 1.5}}"#;
        let err = load_setup_from_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidProbability { name: "crit_chance", .. }
        ));
    }

    #[test]
    fn rejects_negative_multiplier() {
        let config = BattleConfig {
            crit_multiplier: -1.0,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFactor { name: "crit_multiplier", .. })
        ));
    }

    #[test]
    fn rejects_huge_variance_ratio() {
        let json = r#"{"config": {"variance_ratio": 1e30}}"#;
        assert!(matches!(
            load_setup_from_str(json),
            Err(ConfigError::InvalidFactor { name: "variance_ratio", .. })
        ));
        let full = BattleConfig {
            variance_ratio: MAX_VARIANCE_RATIO,
            ..BattleConfig::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            load_setup_from_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_setup(Path::new("/nonexistent/setup.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/setup.json"));
    }
}
