//! Read-only snapshots for the rendering boundary
//!
//! The renderer polls these once per tick and never touches live state.
//! Everything here is plain serializable data; nothing borrows from the
//! simulation.

use serde::Serialize;

use crate::core::types::{Cell, UnitId};
use crate::map::object::ObjectKind;
use crate::turn::{Game, TurnState};

#[derive(Debug, Clone, Serialize)]
pub struct ObjectSnapshot {
    pub cell: Cell,
    pub kind: ObjectKind,
    pub blocks: bool,
    pub target: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileSnapshot {
    pub cell: Cell,
    /// Units threatening this tile (danger highlighting)
    pub threats: Vec<UnitId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub side: &'static str,
    pub cell: Cell,
    pub hp: i32,
    pub active: bool,
    pub moved: bool,
    pub attacked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub state: TurnState,
    pub grid_width: i32,
    pub grid_height: i32,
    pub objects: Vec<ObjectSnapshot>,
    /// Only tiles with a non-empty overlay set
    pub threatened_tiles: Vec<TileSnapshot>,
    pub units: Vec<UnitSnapshot>,
    /// The current MOVE-phase path preview, if any
    pub planned_path: Vec<Cell>,
}

impl Game {
    /// Capture the poll-once-per-tick view of the whole simulation
    pub fn snapshot(&self) -> GameSnapshot {
        let mut objects: Vec<ObjectSnapshot> = self
            .grid
            .objects()
            .map(|o| ObjectSnapshot {
                cell: o.cell,
                kind: o.kind,
                blocks: o.blocks(),
                target: o.target(),
            })
            .collect();
        objects.sort_by_key(|o| (o.cell.y, o.cell.x));

        let threatened_tiles = self
            .grid
            .tiles()
            .filter(|t| t.is_threatened())
            .map(|t| {
                let mut threats: Vec<UnitId> = t.threats().copied().collect();
                threats.sort();
                TileSnapshot {
                    cell: t.cell,
                    threats,
                }
            })
            .collect();

        let units = self
            .roster
            .iter()
            .map(|u| UnitSnapshot {
                id: u.id,
                side: u.side.label(),
                cell: u.cell,
                hp: u.hp,
                active: u.active,
                moved: u.moved,
                attacked: u.attacked,
            })
            .collect();

        GameSnapshot {
            state: self.state(),
            grid_width: self.grid.width,
            grid_height: self.grid.height,
            objects,
            threatened_tiles,
            units,
            planned_path: self.planned_path().to_vec(),
        }
    }
}
