//! Breadth-first pathfinding over the obstacle matrix
//!
//! Movement is 4-directional and unweighted, so plain BFS already yields
//! shortest paths; no heuristic is needed. Paths include both endpoints.
//!
//! The search scratch (visited flags, parent links) is reused between
//! queries and explicitly reset at the start of every query. Stale search
//! state leaking between runs produced wrong paths in an earlier design,
//! so the reset is not optional.

use std::collections::VecDeque;

use crate::combat::roster::Roster;
use crate::core::types::{Cell, UnitId, CARDINALS};
use crate::map::grid::Grid;

/// Boolean passability matrix for one pathfinding run context
///
/// A *static* matrix blocks only where a blocking `MapObject` stands
/// (map validation). A *dynamic* matrix additionally blocks cells held by
/// living combatants, except the moving unit's own cell (a unit is not an
/// obstacle to itself).
#[derive(Debug, Clone)]
pub struct ObstacleMatrix {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl ObstacleMatrix {
    /// Matrix for static runs: blocking map objects only
    pub fn static_run(grid: &Grid) -> Self {
        let mut matrix = Self::open(grid.width, grid.height);
        for object in grid.objects() {
            if object.blocks() {
                matrix.block(object.cell);
            }
        }
        matrix
    }

    /// Matrix for dynamic runs: blocking objects plus living combatants
    ///
    /// `mover` is exempt so the search can start under the querying unit.
    pub fn dynamic_run(grid: &Grid, roster: &Roster, mover: UnitId) -> Self {
        let mut matrix = Self::static_run(grid);
        for unit in roster.living() {
            if unit.id != mover {
                matrix.block(unit.cell);
            }
        }
        matrix
    }

    fn open(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        }
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn block(&mut self, cell: Cell) {
        if self.in_bounds(cell) {
            let idx = self.index(cell);
            self.blocked[idx] = true;
        }
    }

    /// Out-of-bounds cells count as blocked
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.blocked[self.index(cell)]
    }
}

/// BFS shortest-path search with reusable scratch state
///
/// One pathfinder is owned per `Game` and passed by reference to whoever
/// needs it; there is no shared hidden graph between instances.
#[derive(Debug, Default)]
pub struct Pathfinder {
    visited: Vec<bool>,
    parent: Vec<u32>,
    queue: VecDeque<Cell>,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset scratch state for a fresh query
    fn reset(&mut self, cells: usize) {
        self.visited.clear();
        self.visited.resize(cells, false);
        self.parent.clear();
        self.parent.resize(cells, u32::MAX);
        self.queue.clear();
    }

    /// Shortest 4-directional path from `start` to `target`, inclusive of
    /// both endpoints
    ///
    /// Returns an empty path when either endpoint is out of bounds or
    /// blocked, or when no route exists. `find_path(a, a)` on a free cell
    /// returns `[a]`.
    pub fn find_path(&mut self, matrix: &ObstacleMatrix, start: Cell, target: Cell) -> Vec<Cell> {
        if matrix.is_blocked(start) || matrix.is_blocked(target) {
            return Vec::new();
        }
        if start == target {
            return vec![start];
        }

        self.reset((matrix.width * matrix.height) as usize);
        self.visited[matrix.index(start)] = true;
        self.queue.push_back(start);

        while let Some(current) = self.queue.pop_front() {
            for direction in CARDINALS {
                let next = current.offset(direction);
                if matrix.is_blocked(next) {
                    continue;
                }
                let idx = matrix.index(next);
                if self.visited[idx] {
                    continue;
                }
                self.visited[idx] = true;
                self.parent[idx] = matrix.index(current) as u32;
                if next == target {
                    return self.reconstruct(matrix, start, target);
                }
                self.queue.push_back(next);
            }
        }

        Vec::new() // No path
    }

    fn reconstruct(&self, matrix: &ObstacleMatrix, start: Cell, target: Cell) -> Vec<Cell> {
        let mut path = vec![target];
        let mut current = target;
        while current != start {
            let link = self.parent[matrix.index(current)];
            current = Cell::new(link as i32 % matrix.width, link as i32 / matrix.width);
            path.push(current);
        }
        path.reverse();
        path
    }
}

/// Path steps: a path includes both endpoints, so a unit with range `r`
/// may follow paths of up to `r` steps
pub fn path_steps(path: &[Cell]) -> u32 {
    path.len().saturating_sub(1) as u32
}
