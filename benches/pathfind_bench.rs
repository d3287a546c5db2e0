//! Pathfinding and map generation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish::core::config::GameConfig;
use skirmish::map::{generate_map, Grid};
use skirmish::pathfind::{ObstacleMatrix, Pathfinder};

fn generated_grid(seed: u64) -> Grid {
    let config = GameConfig::default();
    let mut grid = Grid::new(config.grid_width, config.grid_height);
    let mut finder = Pathfinder::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_map(&mut grid, &mut finder, &config, &mut rng).unwrap();
    grid
}

fn bench_find_path(c: &mut Criterion) {
    let grid = generated_grid(42);
    let matrix = ObstacleMatrix::static_run(&grid);
    let open = grid.open_cells();
    let (start, target) = (open[0], *open.last().unwrap());
    let mut finder = Pathfinder::new();

    c.bench_function("find_path_corner_to_corner", |b| {
        b.iter(|| {
            let path = finder.find_path(&matrix, black_box(start), black_box(target));
            black_box(path)
        })
    });

    c.bench_function("find_path_all_pairs", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for (i, &a) in open.iter().enumerate() {
                for &b in &open[i + 1..] {
                    total += finder.find_path(&matrix, a, b).len();
                }
            }
            black_box(total)
        })
    });
}

fn bench_generate_map(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("generate_map_default", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            let mut grid = Grid::new(config.grid_width, config.grid_height);
            let mut finder = Pathfinder::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            seed = seed.wrapping_add(1);
            generate_map(&mut grid, &mut finder, &config, &mut rng).unwrap();
            black_box(grid.object_count())
        })
    });
}

fn bench_matrix_build(c: &mut Criterion) {
    let grid = generated_grid(7);

    c.bench_function("static_matrix_build", |b| {
        b.iter(|| black_box(ObstacleMatrix::static_run(&grid)))
    });
}

criterion_group!(
    benches,
    bench_find_path,
    bench_generate_map,
    bench_matrix_build
);
criterion_main!(benches);
