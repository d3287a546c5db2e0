//! Inanimate map entities
//!
//! Everything on the board that is not terrain background or a combatant
//! is a `MapObject`: solid rock, attackable buildings, the ruins a building
//! collapses into. Behavior is a data table on `ObjectKind`, so adding a
//! kind is one enum row, not a new type.

use serde::{Deserialize, Serialize};

use crate::core::types::Cell;

/// Object archetypes and their rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Solid filler terrain the walk carves through
    Rock,
    /// Destructible, attack-worthy structure
    Building,
    /// What a building collapses into; walkable, ignored by the AI
    Ruins,
}

impl ObjectKind {
    /// Does this object block movement?
    pub fn blocks(&self) -> bool {
        match self {
            ObjectKind::Rock | ObjectKind::Building => true,
            ObjectKind::Ruins => false,
        }
    }

    /// Will the AI treat this object as an attackable goal?
    pub fn target(&self) -> bool {
        matches!(self, ObjectKind::Building)
    }

    /// The kind that replaces this one when destroyed; `None` means the
    /// object is removed from the board without replacement
    pub fn successor(&self) -> Option<ObjectKind> {
        match self {
            ObjectKind::Building => Some(ObjectKind::Ruins),
            ObjectKind::Rock | ObjectKind::Ruins => None,
        }
    }

    /// Can an attack do anything to this object at all?
    pub fn destructible(&self) -> bool {
        match self {
            ObjectKind::Building | ObjectKind::Ruins => true,
            ObjectKind::Rock => false,
        }
    }
}

/// An inanimate entity occupying exactly one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub cell: Cell,
    pub kind: ObjectKind,
}

impl MapObject {
    pub fn new(cell: Cell, kind: ObjectKind) -> Self {
        Self { cell, kind }
    }

    pub fn blocks(&self) -> bool {
        self.kind.blocks()
    }

    pub fn target(&self) -> bool {
        self.kind.target()
    }

    /// The replacement object after destruction, at the same cell
    pub fn destroyed(&self) -> Option<MapObject> {
        self.kind.successor().map(|kind| MapObject::new(self.cell, kind))
    }
}
