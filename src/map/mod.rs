//! The board: tiles, map objects, and procedural generation

pub mod generator;
pub mod grid;
pub mod object;
pub mod tile;

pub use generator::generate_map;
pub use grid::Grid;
pub use object::{MapObject, ObjectKind};
pub use tile::Tile;
