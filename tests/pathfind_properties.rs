//! Pathfinder property tests
//!
//! Random boards, structural invariants: every returned path is a real
//! 4-connected walk over open cells, optimal on empty boards, and stable
//! across reruns.

use proptest::prelude::*;

use skirmish::core::types::Cell;
use skirmish::map::{Grid, MapObject, ObjectKind};
use skirmish::pathfind::{path_steps, ObstacleMatrix, Pathfinder};

const SIZE: i32 = 8;

fn cell_strategy() -> impl Strategy<Value = Cell> {
    (0..SIZE, 0..SIZE).prop_map(|(x, y)| Cell::new(x, y))
}

/// A grid with rocks on a random subset of cells
fn grid_strategy() -> impl Strategy<Value = Grid> {
    proptest::collection::hash_set(cell_strategy(), 0..20).prop_map(|rocks| {
        let mut grid = Grid::new(SIZE, SIZE);
        for cell in rocks {
            grid.add_object(MapObject::new(cell, ObjectKind::Rock));
        }
        grid
    })
}

/// Consecutive path cells must be orthogonal neighbors
fn is_connected_walk(path: &[Cell]) -> bool {
    path.windows(2).all(|pair| pair[0].distance(&pair[1]) == 1)
}

proptest! {
    #[test]
    fn empty_board_paths_are_manhattan_optimal(start in cell_strategy(), target in cell_strategy()) {
        let grid = Grid::new(SIZE, SIZE);
        let matrix = ObstacleMatrix::static_run(&grid);
        let mut finder = Pathfinder::new();

        let path = finder.find_path(&matrix, start, target);
        prop_assert!(!path.is_empty());
        prop_assert_eq!(path.first(), Some(&start));
        prop_assert_eq!(path.last(), Some(&target));
        prop_assert_eq!(path_steps(&path), start.distance(&target));
        prop_assert!(is_connected_walk(&path));
    }

    #[test]
    fn found_paths_are_valid_walks_over_open_cells(
        grid in grid_strategy(),
        start in cell_strategy(),
        target in cell_strategy(),
    ) {
        let matrix = ObstacleMatrix::static_run(&grid);
        let mut finder = Pathfinder::new();

        let path = finder.find_path(&matrix, start, target);
        if matrix.is_blocked(start) || matrix.is_blocked(target) {
            prop_assert!(path.is_empty());
        } else if !path.is_empty() {
            prop_assert_eq!(path.first(), Some(&start));
            prop_assert_eq!(path.last(), Some(&target));
            prop_assert!(is_connected_walk(&path));
            prop_assert!(path.iter().all(|&c| !matrix.is_blocked(c)));
        }
    }

    #[test]
    fn reruns_return_the_same_path(
        grid in grid_strategy(),
        start in cell_strategy(),
        target in cell_strategy(),
    ) {
        let matrix = ObstacleMatrix::static_run(&grid);
        let mut finder = Pathfinder::new();

        let first = finder.find_path(&matrix, start, target);
        let second = finder.find_path(&matrix, start, target);
        prop_assert_eq!(first, second);

        // A fresh pathfinder agrees with the reused one
        let fresh = Pathfinder::new().find_path(&matrix, start, target);
        let again = finder.find_path(&matrix, start, target);
        prop_assert_eq!(fresh, again);
    }

    #[test]
    fn self_path_is_the_single_cell(grid in grid_strategy(), cell in cell_strategy()) {
        let matrix = ObstacleMatrix::static_run(&grid);
        let mut finder = Pathfinder::new();

        let path = finder.find_path(&matrix, cell, cell);
        if matrix.is_blocked(cell) {
            prop_assert!(path.is_empty());
        } else {
            prop_assert_eq!(path, vec![cell]);
        }
    }
}
