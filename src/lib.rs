//! Skirmish - deterministic simulation core for a grid-based tactics game
//!
//! Rendering, input devices, and asset handling live outside this crate;
//! the boundary is cell-coordinate events in (`turn::InputEvent`) and
//! serializable snapshots out (`snapshot::GameSnapshot`). A run is fully
//! reproducible from its seed string.

pub mod ai;
pub mod combat;
pub mod core;
pub mod map;
pub mod pathfind;
pub mod snapshot;
pub mod turn;

// Re-exports for convenient access
pub use ai::{AiPhase, AiState, Decision, Target, TileRecord};
pub use combat::{Archetype, Attack, Combatant, Effect, Roster, Side};
pub use crate::core::config::GameConfig;
pub use crate::core::error::{Result, SkirmishError};
pub use crate::core::types::{Cell, Offset, UnitId, CARDINALS};
pub use map::{generate_map, Grid, MapObject, ObjectKind, Tile};
pub use pathfind::{path_steps, ObstacleMatrix, Pathfinder};
pub use snapshot::GameSnapshot;
pub use turn::{Game, InputEvent, TurnState};
