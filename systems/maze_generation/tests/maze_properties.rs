use std::collections::VecDeque;

use hamster_maze_core::{Cell, CellCoord, Direction, GoalPolicy, MazeGrid};
use hamster_maze_system_maze_generation::{carve, is_goal_reachable, MazeGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SHAPES: [(u32, u32); 9] = [
    (2, 2),
    (2, 7),
    (3, 4),
    (5, 5),
    (10, 10),
    (11, 13),
    (10, 7),
    (16, 9),
    (31, 31),
];

#[test]
fn generated_mazes_keep_shape_goal_and_corridor() {
    for seed in 0..32 {
        for (rows, columns) in SHAPES {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = carve(rows, columns, &mut rng).expect("valid shape");

            assert_eq!(grid.rows(), rows);
            assert_eq!(grid.columns(), columns);
            assert_eq!(grid.cells().len(), (rows * columns) as usize);
            assert!(
                grid.is_open(grid.goal().cell()),
                "goal closed for seed {seed} in {rows}x{columns}"
            );
            for column in 0..columns.min(5) {
                assert!(
                    grid.is_open(CellCoord::new(column, 0)),
                    "corridor cell {column} closed for seed {seed} in {rows}x{columns}"
                );
            }
        }
    }
}

#[test]
fn carved_region_is_a_tree() {
    for seed in 0..32 {
        for (rows, columns) in SHAPES {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = carve(rows, columns, &mut rng).expect("valid shape");
            let (nodes, edges) = reachable_nodes_and_edges(&grid);

            assert!(nodes > 0);
            assert_eq!(
                edges,
                nodes - 1,
                "open region contains a cycle for seed {seed} in {rows}x{columns}"
            );
        }
    }
}

#[test]
fn starting_corridor_is_walkable_in_default_maze() {
    let mut generator = MazeGenerator::from_seed(2024);
    let grid = generator.generate(10, 10).expect("valid shape");

    let row = grid.row(0).expect("row 0 exists");
    assert!(row[..5].iter().all(|cell| *cell == Cell::Open));
}

#[test]
fn narrow_mazes_clamp_the_corridor() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let grid = carve(6, 3, &mut rng).expect("valid shape");
    for column in 0..3 {
        assert!(grid.is_open(CellCoord::new(column, 0)));
    }

    let single = carve(1, 1, &mut rng).expect("valid shape");
    assert_eq!(single.cells(), &[Cell::Open]);
}

#[test]
fn connected_policy_always_reaches_goal() {
    for seed in 0..64 {
        for (rows, columns) in SHAPES {
            let mut generator =
                MazeGenerator::from_seed(seed).with_goal_policy(GoalPolicy::Connected);
            let grid = generator.generate(rows, columns).expect("valid shape");
            assert!(
                is_goal_reachable(&grid),
                "goal unreachable for seed {seed} in {rows}x{columns}"
            );
        }
    }
}

#[test]
fn as_carved_policy_leaves_unreachable_goals_alone() {
    // In a 10x7 maze the goal sits diagonally off the last room and both of
    // its neighbours lead out of the grid, so the carve never reaches it.
    for seed in 0..8 {
        let mut generator = MazeGenerator::from_seed(seed);
        let grid = generator.generate(10, 7).expect("valid shape");
        assert!(grid.is_open(grid.goal().cell()));
        assert!(!is_goal_reachable(&grid));

        let mut generator =
            MazeGenerator::from_seed(seed).with_goal_policy(GoalPolicy::Connected);
        let grid = generator.generate(10, 7).expect("valid shape");
        assert!(is_goal_reachable(&grid));
    }
}

fn reachable_nodes_and_edges(grid: &MazeGrid) -> (usize, usize) {
    let mut seen = vec![false; grid.cells().len()];
    let mut queue = VecDeque::new();
    let origin = grid.index(CellCoord::ORIGIN).expect("origin inside grid");
    seen[origin] = true;
    queue.push_back(CellCoord::ORIGIN);

    let mut nodes = 0;
    let mut edges = 0;
    while let Some(cell) = queue.pop_front() {
        nodes += 1;
        for direction in [Direction::Right, Direction::Down] {
            if let Some(next) = grid.neighbor(cell, direction, 1) {
                if grid.is_open(next) {
                    edges += 1;
                }
            }
        }
        for direction in Direction::ALL {
            let Some(next) = grid.neighbor(cell, direction, 1) else {
                continue;
            };
            let index = grid.index(next).expect("neighbor inside grid");
            if grid.is_open(next) && !seen[index] {
                seen[index] = true;
                queue.push_back(next);
            }
        }
    }
    (nodes, edges)
}
