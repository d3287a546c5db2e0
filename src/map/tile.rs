//! Board tiles
//!
//! One `Tile` per cell. The position never changes; the threat overlay is
//! the only mutable part, written by the AI engine after enemy decisions and
//! read back by the renderer for danger highlighting.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, UnitId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub cell: Cell,
    /// Units currently threatening this tile (UI annotation only)
    threats: AHashSet<UnitId>,
}

impl Tile {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            threats: AHashSet::new(),
        }
    }

    pub fn add_threat(&mut self, unit: UnitId) {
        self.threats.insert(unit);
    }

    pub fn remove_threat(&mut self, unit: UnitId) {
        self.threats.remove(&unit);
    }

    pub fn clear_threats(&mut self) {
        self.threats.clear();
    }

    pub fn is_threatened(&self) -> bool {
        !self.threats.is_empty()
    }

    pub fn threats(&self) -> impl Iterator<Item = &UnitId> {
        self.threats.iter()
    }
}
