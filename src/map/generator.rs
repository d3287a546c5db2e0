//! Procedural map generation
//!
//! Generate-and-test: fill the board solid, carve corridors with a
//! drunkard's walk, place destructible buildings, then validate quadrant
//! uniformity and the longest-shortest-path bound. Rejected maps are fully
//! discarded and regenerated, up to a configured attempt cap.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::GameConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{Cell, CARDINALS};
use crate::map::grid::Grid;
use crate::map::object::{MapObject, ObjectKind};
use crate::pathfind::{path_steps, ObstacleMatrix, Pathfinder};

/// Generate a validated map into `grid`
///
/// The loop is bounded: exceeding `max_generation_attempts` means the
/// tolerances cannot be met on this grid size and is a configuration
/// error, not something to retry forever.
pub fn generate_map(
    grid: &mut Grid,
    pathfinder: &mut Pathfinder,
    config: &GameConfig,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    for attempt in 1..=config.max_generation_attempts {
        grid.fill_solid();

        let budget = rng.gen_range(config.walk_steps_min..=config.walk_steps_max);
        drunkards_walk(grid, rng, None, budget);
        place_buildings(grid, config, rng);

        if !quadrants_uniform(grid, config) {
            tracing::debug!(attempt, "map rejected: quadrant occupancy outside tolerance");
            continue;
        }
        if !longest_path_within_bound(grid, pathfinder, config) {
            tracing::debug!(attempt, "map rejected: longest shortest path over bound");
            continue;
        }

        tracing::info!(attempt, open_cells = grid.open_cells().len(), "map accepted");
        return Ok(());
    }

    Err(SkirmishError::MapGeneration {
        attempts: config.max_generation_attempts,
        width: grid.width,
        height: grid.height,
    })
}

/// Carve `budget` cells out of the solid fill with a random walk
///
/// The walker starts at `start` (random when `None`) and repeatedly steps
/// in a uniformly chosen cardinal direction. Landing on a blocking object
/// carves it and consumes one unit of budget; revisiting an already-carved
/// cell is free. A step that would leave the grid re-rolls without
/// consuming budget. The carved region is connected by construction.
pub fn drunkards_walk(grid: &mut Grid, rng: &mut ChaCha8Rng, start: Option<Cell>, budget: u32) {
    let mut current = start.unwrap_or_else(|| {
        Cell::new(rng.gen_range(0..grid.width), rng.gen_range(0..grid.height))
    });
    let mut remaining = budget;

    if carve(grid, current) {
        remaining = remaining.saturating_sub(1);
    }

    while remaining > 0 {
        let direction = CARDINALS[rng.gen_range(0..CARDINALS.len())];
        let next = current.offset(direction);
        if !grid.in_bounds(next) {
            continue; // Re-roll, budget untouched
        }
        current = next;
        if carve(grid, current) {
            remaining -= 1;
        }
    }
}

/// Remove a blocking object from `cell`; true if something was carved
fn carve(grid: &mut Grid, cell: Cell) -> bool {
    if grid.object_at(cell).map_or(false, |o| o.blocks()) {
        grid.remove_object(cell);
        true
    } else {
        false
    }
}

/// Replace a random selection of still-solid cells with buildings
///
/// Only cells with at least one in-bounds orthogonal neighbor free of
/// blocking objects qualify, so every building has a side it can be
/// attacked from.
fn place_buildings(grid: &mut Grid, config: &GameConfig, rng: &mut ChaCha8Rng) {
    let count = rng.gen_range(config.buildings_min..=config.buildings_max);
    for _ in 0..count {
        let candidates = building_sites(grid);
        if candidates.is_empty() {
            tracing::warn!("no eligible building site left, placing fewer buildings");
            break;
        }
        let cell = candidates[rng.gen_range(0..candidates.len())];
        grid.add_object(MapObject::new(cell, ObjectKind::Building));
    }
}

/// Still-solid rock cells with a free orthogonal neighbor, in scan order
fn building_sites(grid: &Grid) -> Vec<Cell> {
    let mut sites = Vec::new();
    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = Cell::new(x, y);
            let solid_rock = grid
                .object_at(cell)
                .map_or(false, |o| o.kind == ObjectKind::Rock);
            if !solid_rock {
                continue;
            }
            let approachable = cell
                .neighbors()
                .iter()
                .any(|&n| grid.in_bounds(n) && grid.is_open(n));
            if approachable {
                sites.push(cell);
            }
        }
    }
    sites
}

/// Quadrant-occupancy validator
///
/// Splits the board into four quadrants, counts blocking objects in each,
/// and requires every count to stay within the configured percentage band
/// around the mean.
pub fn quadrants_uniform(grid: &Grid, config: &GameConfig) -> bool {
    let mid_x = grid.width / 2;
    let mid_y = grid.height / 2;
    let mut counts = [0u32; 4];

    for object in grid.objects() {
        if !object.blocks() {
            continue;
        }
        let right = object.cell.x >= mid_x;
        let bottom = object.cell.y >= mid_y;
        counts[(bottom as usize) * 2 + right as usize] += 1;
    }

    let mean = counts.iter().sum::<u32>() as f32 / 4.0;
    let low = mean - mean * config.quadrant_tolerance_neg / 100.0;
    let high = mean + mean * config.quadrant_tolerance_pos / 100.0;
    counts.iter().all(|&c| (c as f32) >= low && (c as f32) <= high)
}

/// Longest-shortest-path validator
///
/// Every pair of distinct open tiles must be connected by a path of at
/// most `longest_path_bound` steps; an unreachable pair also rejects the
/// map.
pub fn longest_path_within_bound(
    grid: &Grid,
    pathfinder: &mut Pathfinder,
    config: &GameConfig,
) -> bool {
    let matrix = ObstacleMatrix::static_run(grid);
    let open = grid.open_cells();

    for (i, &a) in open.iter().enumerate() {
        for &b in &open[i + 1..] {
            let path = pathfinder.find_path(&matrix, a, b);
            if path.is_empty() || path_steps(&path) > config.longest_path_bound {
                return false;
            }
        }
    }
    true
}
