//! Combatants
//!
//! One `Combatant` struct for both sides; the differences live in the
//! `Archetype` data table (hit points, attack template), not in parallel
//! type hierarchies.

use serde::{Deserialize, Serialize};

use crate::ai::AiState;
use crate::combat::attack::Attack;
use crate::core::types::{Cell, UnitId};

/// Which army a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Enemy => "enemy",
        }
    }
}

/// Unit archetypes and their stat table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Player-controlled line unit
    Soldier,
    /// AI-controlled attacker with the side+wall punch kit
    Raider,
}

impl Archetype {
    pub fn side(&self) -> Side {
        match self {
            Archetype::Soldier => Side::Player,
            Archetype::Raider => Side::Enemy,
        }
    }

    pub fn base_hp(&self) -> i32 {
        match self {
            Archetype::Soldier => 3,
            Archetype::Raider => 2,
        }
    }

    pub fn attack(&self) -> Attack {
        match self {
            Archetype::Soldier => Attack::punch(),
            Archetype::Raider => Attack::combined(&[Attack::side_punch(), Attack::wall_punch()]),
        }
    }
}

/// An animate unit on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: UnitId,
    pub side: Side,
    pub archetype: Archetype,
    pub cell: Cell,
    pub hp: i32,
    /// Maximum path steps per turn
    pub move_range: u32,
    pub attack: Attack,

    // Per-turn flags, reset at the start of each side's turn
    pub active: bool,
    pub moved: bool,
    pub attacked: bool,

    /// Decision engine state; populated for enemies only
    #[serde(skip)]
    pub ai: Option<AiState>,
}

impl Combatant {
    pub fn new(id: UnitId, archetype: Archetype, cell: Cell, hp: i32, move_range: u32) -> Self {
        let side = archetype.side();
        Self {
            id,
            side,
            archetype,
            cell,
            hp,
            move_range,
            attack: archetype.attack(),
            active: false,
            moved: false,
            attacked: false,
            ai: match side {
                Side::Enemy => Some(AiState::default()),
                Side::Player => None,
            },
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn move_to(&mut self, cell: Cell) {
        self.cell = cell;
    }

    pub fn reset_turn_flags(&mut self) {
        self.active = false;
        self.moved = false;
        self.attacked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_table() {
        assert_eq!(Archetype::Soldier.side(), Side::Player);
        assert_eq!(Archetype::Raider.side(), Side::Enemy);
        assert!(Archetype::Soldier.base_hp() > Archetype::Raider.base_hp());
        assert_eq!(Archetype::Raider.attack().effects.len(), 4);
    }

    #[test]
    fn test_only_enemies_carry_an_ai_engine() {
        let soldier = Combatant::new(UnitId(0), Archetype::Soldier, Cell::new(0, 0), 3, 2);
        let raider = Combatant::new(UnitId(1), Archetype::Raider, Cell::new(1, 0), 2, 2);
        assert!(soldier.ai.is_none());
        assert!(raider.ai.is_some());
    }

    #[test]
    fn test_turn_flag_reset() {
        let mut unit = Combatant::new(UnitId(0), Archetype::Soldier, Cell::new(0, 0), 3, 2);
        unit.active = true;
        unit.moved = true;
        unit.attacked = true;
        unit.reset_turn_flags();
        assert!(!unit.active && !unit.moved && !unit.attacked);
    }
}
