//! The game board: tiles plus the map-object collection
//!
//! The grid owns every `MapObject`. Destruction is atomic: the old object
//! is removed and its successor (if any) inserted in one call, so no
//! intermediate state is observable.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, UnitId};
use crate::map::object::{MapObject, ObjectKind};
use crate::map::tile::Tile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    objects: AHashMap<Cell, MapObject>,
}

impl Grid {
    /// Create an empty grid (tiles only, no objects)
    pub fn new(width: i32, height: i32) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Cell::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
            objects: AHashMap::new(),
        }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn tile_index(&self, cell: Cell) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        if self.in_bounds(cell) {
            Some(&self.tiles[self.tile_index(cell)])
        } else {
            None
        }
    }

    pub fn tile_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        if self.in_bounds(cell) {
            let idx = self.tile_index(cell);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn object_at(&self, cell: Cell) -> Option<&MapObject> {
        self.objects.get(&cell)
    }

    /// A cell holds at most one object; inserting over an existing one
    /// replaces it
    pub fn add_object(&mut self, object: MapObject) {
        self.objects.insert(object.cell, object);
    }

    pub fn remove_object(&mut self, cell: Cell) -> Option<MapObject> {
        self.objects.remove(&cell)
    }

    pub fn objects(&self) -> impl Iterator<Item = &MapObject> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Is this cell free of blocking objects?
    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.object_at(cell).map_or(false, |o| o.blocks())
    }

    /// Destroy the object at `cell` if it is destructible
    ///
    /// Replacement is atomic: the successor (ruins for a building) lands in
    /// the same call that removes the original. Indestructible objects are
    /// left untouched. Returns the successor, `None` if nothing changed or
    /// the object vanished without replacement.
    pub fn destroy_object(&mut self, cell: Cell) -> Option<MapObject> {
        let object = *self.objects.get(&cell)?;
        if !object.kind.destructible() {
            return None;
        }
        self.objects.remove(&cell);
        let successor = object.destroyed();
        if let Some(successor) = successor {
            self.objects.insert(cell, successor);
        }
        successor
    }

    /// Re-fill every cell with solid rock, discarding the object layer
    ///
    /// This is the reset the generator's regenerate-on-rejection loop uses.
    pub fn fill_solid(&mut self) {
        self.objects.clear();
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell::new(x, y);
                self.objects.insert(cell, MapObject::new(cell, ObjectKind::Rock));
            }
        }
    }

    /// All cells currently free of blocking objects, in scan order
    pub fn open_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell::new(x, y);
                if self.is_open(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    pub fn clear_threats(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_threats();
        }
    }

    pub fn remove_threats_of(&mut self, unit: UnitId) {
        for tile in &mut self.tiles {
            tile.remove_threat(unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_tiles_cover_every_cell() {
        let grid = Grid::new(8, 8);
        assert_eq!(grid.tiles().count(), 64);
        assert!(grid.tile(Cell::new(7, 7)).is_some());
        assert!(grid.tile(Cell::new(8, 7)).is_none());
    }

    #[test]
    fn test_fill_solid_blocks_everything() {
        let mut grid = Grid::new(4, 4);
        grid.fill_solid();
        assert_eq!(grid.object_count(), 16);
        assert!(grid.open_cells().is_empty());
    }

    #[test]
    fn test_destroy_building_replaces_with_ruins() {
        let mut grid = Grid::new(4, 4);
        let cell = Cell::new(2, 2);
        grid.add_object(MapObject::new(cell, ObjectKind::Building));

        let successor = grid.destroy_object(cell).unwrap();
        assert_eq!(successor.kind, ObjectKind::Ruins);
        assert_eq!(grid.object_at(cell).unwrap().kind, ObjectKind::Ruins);
        assert!(grid.is_open(cell));
    }

    #[test]
    fn test_destroy_rock_is_a_noop() {
        let mut grid = Grid::new(4, 4);
        let cell = Cell::new(1, 1);
        grid.add_object(MapObject::new(cell, ObjectKind::Rock));

        assert!(grid.destroy_object(cell).is_none());
        assert_eq!(grid.object_at(cell).unwrap().kind, ObjectKind::Rock);
    }

    #[test]
    fn test_destroy_successor_less_removes_outright() {
        let mut grid = Grid::new(4, 4);
        let cell = Cell::new(1, 1);
        grid.add_object(MapObject::new(cell, ObjectKind::Ruins));

        assert!(grid.destroy_object(cell).is_none());
        assert!(grid.object_at(cell).is_none());
    }
}
