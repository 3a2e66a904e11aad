#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised backtracking maze generator.
//!
//! Mazes are carved over a half-resolution lattice: cells at even offsets from
//! the carve origin are rooms, the cells between two rooms are walls that get
//! knocked down when the carve passes through them. Every room reached by the
//! carve is therefore joined to the others by exactly one simple path.

use std::collections::VecDeque;

use hamster_maze_core::{
    Cell, CellCoord, Direction, GoalPolicy, GridError, MazeGrid, STARTING_CORRIDOR_LENGTH,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stateful generator producing a fresh maze for every level.
#[derive(Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
    goal_policy: GoalPolicy,
}

impl MazeGenerator {
    /// Creates a generator whose maze sequence is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            goal_policy: GoalPolicy::default(),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            goal_policy: GoalPolicy::default(),
        }
    }

    /// Selects how unreachable goals are handled.
    #[must_use]
    pub fn with_goal_policy(mut self, goal_policy: GoalPolicy) -> Self {
        self.goal_policy = goal_policy;
        self
    }

    /// Policy applied to the goal after carving.
    #[must_use]
    pub const fn goal_policy(&self) -> GoalPolicy {
        self.goal_policy
    }

    /// Generates a new maze with the requested shape.
    pub fn generate(&mut self, rows: u32, columns: u32) -> Result<MazeGrid, GridError> {
        let mut grid = carve(rows, columns, &mut self.rng)?;
        if self.goal_policy == GoalPolicy::Connected && connect_goal(&mut grid) {
            log::debug!("opened a corridor to the isolated goal of a {rows}x{columns} maze");
        }
        Ok(grid)
    }
}

/// Carves a maze of the requested shape using the provided random source.
///
/// Every cell starts as a wall. The first [`STARTING_CORRIDOR_LENGTH`] cells of
/// row 0 are opened, the carve starts at the end of that corridor, and the goal
/// cell is opened last whether or not the carve reached it.
pub fn carve<R>(rows: u32, columns: u32, rng: &mut R) -> Result<MazeGrid, GridError>
where
    R: Rng + ?Sized,
{
    let mut grid = MazeGrid::filled(rows, columns, Cell::Wall)?;

    for column in 0..STARTING_CORRIDOR_LENGTH.min(columns) {
        let _ = grid.set(CellCoord::new(column, 0), Cell::Open);
    }

    let start = CellCoord::new(STARTING_CORRIDOR_LENGTH.min(columns - 1), 0);
    let mut stack = vec![CarveFrame::new(start, &mut *rng)];

    while let Some(frame) = stack.last_mut() {
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };
        let current = frame.cell;

        let Some(next) = grid.neighbor(current, direction, 2) else {
            continue;
        };
        if grid.is_open(next) {
            continue;
        }
        let Some(between) = grid.neighbor(current, direction, 1) else {
            continue;
        };

        for cell in [current, between, next] {
            let _ = grid.set(cell, Cell::Open);
        }
        stack.push(CarveFrame::new(next, &mut *rng));
    }

    let goal = grid.goal().cell();
    let _ = grid.set(goal, Cell::Open);

    Ok(grid)
}

/// Reports whether the goal can be walked to from the origin through open cells.
#[must_use]
pub fn is_goal_reachable(grid: &MazeGrid) -> bool {
    let reached = reachable_from_origin(grid);
    grid.index(grid.goal().cell()).is_some_and(|index| reached[index])
}

/// Opens an L-shaped corridor from the closest reachable cell to the goal.
///
/// Returns `true` when cells were opened, `false` when the goal was already
/// reachable.
pub fn connect_goal(grid: &mut MazeGrid) -> bool {
    let reached = reachable_from_origin(grid);
    let goal = grid.goal().cell();
    if grid.index(goal).is_some_and(|index| reached[index]) {
        return false;
    }

    let anchor = reached
        .iter()
        .enumerate()
        .filter(|(_, reached)| **reached)
        .filter_map(|(index, _)| grid.coord(index))
        .min_by_key(|cell| (cell.manhattan_distance(goal), *cell));
    let Some(anchor) = anchor else {
        return false;
    };

    let (low_row, high_row) = ordered(anchor.row(), goal.row());
    for row in low_row..=high_row {
        let _ = grid.set(CellCoord::new(anchor.column(), row), Cell::Open);
    }
    let (low_column, high_column) = ordered(anchor.column(), goal.column());
    for column in low_column..=high_column {
        let _ = grid.set(CellCoord::new(column, goal.row()), Cell::Open);
    }
    true
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn reachable_from_origin(grid: &MazeGrid) -> Vec<bool> {
    let mut reached = vec![false; grid.cells().len()];
    let Some(origin) = grid.index(CellCoord::ORIGIN) else {
        return reached;
    };
    if !grid.is_open(CellCoord::ORIGIN) {
        return reached;
    }

    let mut queue = VecDeque::new();
    reached[origin] = true;
    queue.push_back(CellCoord::ORIGIN);

    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let Some(next) = grid.neighbor(cell, direction, 1) else {
                continue;
            };
            let Some(index) = grid.index(next) else {
                continue;
            };
            if !reached[index] && grid.is_open(next) {
                reached[index] = true;
                queue.push_back(next);
            }
        }
    }

    reached
}

/// Pending work for one room on the explicit carve stack.
#[derive(Debug)]
struct CarveFrame {
    cell: CellCoord,
    directions: [Direction; 4],
    cursor: usize,
}

impl CarveFrame {
    fn new<R>(cell: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            cursor: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(direction)
    }
}
