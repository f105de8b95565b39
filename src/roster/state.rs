//! Both rosters for one battle.

use super::unit::{Side, Unit, UnitSnapshot};

/// The party and enemy rosters.
///
/// Slot order is fixed for the whole battle; retargeting and enemy turn order
/// both depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rosters {
    pub party: Vec<Unit>,
    pub enemies: Vec<Unit>,
}

impl Rosters {
    pub fn new(party: Vec<Unit>, enemies: Vec<Unit>) -> Self {
        Rosters { party, enemies }
    }

    /// Returns the roster for a side.
    pub fn side(&self, side: Side) -> &[Unit] {
        match side {
            Side::Party => &self.party,
            Side::Enemy => &self.enemies,
        }
    }

    /// Returns a unit by side and slot, if the slot exists.
    pub fn unit(&self, side: Side, index: usize) -> Option<&Unit> {
        self.side(side).get(index)
    }

    /// True when every unit on the side is dead. An empty roster counts as wiped.
    pub fn all_dead(&self, side: Side) -> bool {
        self.side(side).iter().all(Unit::is_dead)
    }

    /// True while both sides still have a living unit.
    pub fn both_standing(&self) -> bool {
        !self.all_dead(Side::Party) && !self.all_dead(Side::Enemy)
    }

    pub fn is_alive(&self, side: Side, index: usize) -> bool {
        self.unit(side, index).is_some_and(Unit::is_alive)
    }

    /// First living slot in roster order.
    pub fn first_living(&self, side: Side) -> Option<usize> {
        self.side(side).iter().position(Unit::is_alive)
    }

    /// All living slots in roster order.
    pub fn living(&self, side: Side) -> Vec<usize> {
        self.side(side)
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn snapshots(&self, side: Side) -> Vec<UnitSnapshot> {
        self.side(side).iter().map(UnitSnapshot::from).collect()
    }

    /// Borrows an attacker immutably and a defender mutably at once.
    ///
    /// The two always live in different rosters, so the borrows never alias.
    pub fn pair_mut(
        &mut self,
        attacker_side: Side,
        attacker: usize,
        defender: usize,
    ) -> Option<(&Unit, &mut Unit)> {
        let (own, other) = match attacker_side {
            Side::Party => (&self.party, &mut self.enemies),
            Side::Enemy => (&self.enemies, &mut self.party),
        };
        Some((own.get(attacker)?, other.get_mut(defender)?))
    }
}

/// Labels for the target list, e.g. `1. Imp`.
pub fn target_options(enemies: &[Unit]) -> Vec<String> {
    enemies
        .iter()
        .enumerate()
        .map(|(i, u)| format!("{}. {}", i + 1, u.name()))
        .collect()
}
