//! Core coordinate and identifier types
//!
//! The simulation operates exclusively in cell coordinates; pixel
//! conversion is the renderer's problem. Origin is the top-left corner,
//! `y` grows downward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Apply a relative offset, without bounds checking
    pub fn offset(&self, offset: Offset) -> Cell {
        Cell::new(self.x + offset.dx, self.y + offset.dy)
    }

    /// The four orthogonal neighbors (diagonals are not legal moves)
    pub fn neighbors(&self) -> [Cell; 4] {
        CARDINALS.map(|d| self.offset(d))
    }

    /// 4-directional (Manhattan) distance
    pub fn distance(&self, other: &Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cell-relative displacement (aim offsets, attack patterns, walk steps)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// The four cardinal directions, in scan order (up, down, left, right)
pub const CARDINALS: [Offset; 4] = [
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(-1, 0),
    Offset::new(1, 0),
];

/// Unique identifier for combatants
///
/// Sequential rather than random so that two runs with the same seed
/// produce byte-identical snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}
