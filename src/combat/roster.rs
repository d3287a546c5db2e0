//! The combatant roster
//!
//! Owns every unit on the board. Iteration order is spawn order, which the
//! AI's tie-breaking and the enemy turn sequence both rely on being stable.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::unit::{Archetype, Combatant, Side};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{Cell, UnitId};
use crate::map::grid::Grid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Combatant>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        archetype: Archetype,
        cell: Cell,
        hp: i32,
        move_range: u32,
    ) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units
            .push(Combatant::new(id, archetype, cell, hp, move_range));
        id
    }

    /// Spawn on a uniformly chosen open cell, retrying on collision
    pub fn spawn_on_free_cell(
        &mut self,
        grid: &Grid,
        rng: &mut ChaCha8Rng,
        archetype: Archetype,
        move_range: u32,
        attempts: u32,
    ) -> Result<UnitId> {
        for _ in 0..attempts {
            let cell = Cell::new(
                rng.gen_range(0..grid.width),
                rng.gen_range(0..grid.height),
            );
            if grid.is_open(cell) && self.unit_at(cell).is_none() {
                return Ok(self.spawn(archetype, cell, archetype.base_hp(), move_range));
            }
        }
        Err(SkirmishError::SpawnFailed {
            side: archetype.side().label(),
            attempts,
        })
    }

    pub fn unit(&self, id: UnitId) -> Option<&Combatant> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Combatant> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// The living combatant standing on `cell`, if any
    pub fn unit_at(&self, cell: Cell) -> Option<&Combatant> {
        self.units.iter().find(|u| u.is_alive() && u.cell == cell)
    }

    pub fn unit_at_mut(&mut self, cell: Cell) -> Option<&mut Combatant> {
        self.units
            .iter_mut()
            .find(|u| u.is_alive() && u.cell == cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.units.iter_mut()
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter().filter(|u| u.is_alive())
    }

    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &Combatant> + '_ {
        self.living().filter(move |u| u.side == side)
    }

    /// The next enemy that has not moved this turn, in spawn order
    pub fn next_unmoved_enemy(&self) -> Option<UnitId> {
        self.living_on(Side::Enemy)
            .find(|u| !u.moved)
            .map(|u| u.id)
    }

    pub fn any_active(&self, side: Side) -> bool {
        self.living_on(side).any(|u| u.active)
    }

    /// Remove units at hp <= 0; returns the fallen for overlay cleanup
    pub fn remove_dead(&mut self) -> Vec<UnitId> {
        let dead: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| !u.is_alive())
            .map(|u| u.id)
            .collect();
        self.units.retain(|u| u.is_alive());
        dead
    }

    pub fn reset_turn_flags(&mut self) {
        for unit in &mut self.units {
            unit.reset_turn_flags();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_unit_lookup_by_cell_skips_dead() {
        let mut roster = Roster::new();
        let id = roster.spawn(Archetype::Raider, Cell::new(2, 2), 2, 2);
        assert!(roster.unit_at(Cell::new(2, 2)).is_some());

        roster.unit_mut(id).unwrap().hp = 0;
        assert!(roster.unit_at(Cell::new(2, 2)).is_none());
    }

    #[test]
    fn test_remove_dead_reports_the_fallen() {
        let mut roster = Roster::new();
        let a = roster.spawn(Archetype::Soldier, Cell::new(0, 0), 1, 2);
        let b = roster.spawn(Archetype::Raider, Cell::new(1, 0), 2, 2);
        roster.unit_mut(a).unwrap().hp = 0;

        assert_eq!(roster.remove_dead(), vec![a]);
        assert!(roster.unit(a).is_none());
        assert!(roster.unit(b).is_some());
    }

    #[test]
    fn test_spawn_on_free_cell_avoids_occupied() {
        let mut grid = Grid::new(2, 1);
        grid.fill_solid();
        grid.remove_object(Cell::new(0, 0));
        grid.remove_object(Cell::new(1, 0));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = Roster::new();
        let a = roster
            .spawn_on_free_cell(&grid, &mut rng, Archetype::Soldier, 2, 100)
            .unwrap();
        let b = roster
            .spawn_on_free_cell(&grid, &mut rng, Archetype::Raider, 2, 100)
            .unwrap();
        assert_ne!(
            roster.unit(a).unwrap().cell,
            roster.unit(b).unwrap().cell
        );

        // Board is now full
        assert!(roster
            .spawn_on_free_cell(&grid, &mut rng, Archetype::Raider, 2, 50)
            .is_err());
    }

    #[test]
    fn test_next_unmoved_enemy_in_spawn_order() {
        let mut roster = Roster::new();
        let first = roster.spawn(Archetype::Raider, Cell::new(0, 0), 2, 2);
        let second = roster.spawn(Archetype::Raider, Cell::new(1, 0), 2, 2);

        assert_eq!(roster.next_unmoved_enemy(), Some(first));
        roster.unit_mut(first).unwrap().moved = true;
        assert_eq!(roster.next_unmoved_enemy(), Some(second));
        roster.unit_mut(second).unwrap().moved = true;
        assert_eq!(roster.next_unmoved_enemy(), None);
    }
}
