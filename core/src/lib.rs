#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hamster Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hamster Maze.";

/// Number of cells at the start of row 0 that are always carved open.
pub const STARTING_CORRIDOR_LENGTH: u32 = 5;

/// Default number of rows in the maze.
pub const DEFAULT_ROWS: u32 = 10;

/// Default number of columns in the maze.
pub const DEFAULT_COLUMNS: u32 = 10;

/// Default tick interval used on level 1, in milliseconds.
pub const DEFAULT_BASE_SPEED_MS: u64 = 500;

/// Factor applied to the tick interval each time a level is completed.
pub const LEVEL_SPEED_FACTOR: f64 = 0.9;

/// Shortest tick interval a level can reach, in milliseconds.
///
/// Levels completed once the interval has shrunk to this floor keep it.
pub const MIN_SPEED_MS: f64 = 1.0;

/// Points awarded per tick while playing at the base speed.
pub const BASE_POINTS_PER_TICK: f64 = 10.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the wall clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records the direction the actor should face on the next advance.
    SetDirection {
        /// Desired facing.
        direction: Direction,
    },
    /// Moves the actor one cell and evaluates the outcome.
    Advance,
    /// Starts a fresh game: new maze, level 1, zero score.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the wall clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the actor's desired facing changed.
    DirectionChanged {
        /// Facing recorded for the next advance.
        direction: Direction,
    },
    /// Confirms that the actor moved between two cells.
    ActorMoved {
        /// Cell the actor occupied before moving.
        from: CellCoord,
        /// Cell the actor occupies after the move.
        to: CellCoord,
        /// Facing used for the move.
        facing: Direction,
    },
    /// Reports that the actor tried to leave the grid and stayed in place.
    BlockedAtBorder {
        /// Cell the actor still occupies.
        cell: CellCoord,
        /// Facing that pointed out of the grid.
        facing: Direction,
    },
    /// Reports that the actor ran into a wall and the game was reset.
    Collided {
        /// Wall cell the actor ran into.
        cell: CellCoord,
        /// Score reached before the reset.
        final_score: u64,
    },
    /// Reports that the actor reached the goal and a new level began.
    GoalReached {
        /// Level that just started.
        level: u32,
    },
    /// Announces a new tick interval.
    SpeedChanged {
        /// Interval between ticks from now on.
        speed: Duration,
    },
    /// Announces a new score.
    ScoreChanged {
        /// Current score.
        score: u64,
    },
    /// Announces that a freshly generated maze replaced the previous one.
    MazeRegenerated,
    /// Summarises a single advance.
    Advanced {
        /// Classification of what happened.
        outcome: Outcome,
    },
}

/// Classification of a single advance of the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The actor moved into an open cell that is not the goal.
    Moved,
    /// The actor faced the grid border and stayed in place.
    BlockedAtBorder,
    /// The actor ran into a wall; the game restarted at level 1.
    Collided,
    /// The actor reached the goal; the next level started.
    GoalReached,
}

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable cell.
    #[default]
    Wall,
    /// Passable cell.
    Open,
}

impl Cell {
    /// Reports whether the cell can be walked on.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Cardinal directions available to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Column and row offsets of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Top-left cell where the actor spawns.
    pub const ORIGIN: CellCoord = CellCoord::new(0, 0);

    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

/// Errors raised when constructing a maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid needs at least one row and one column.
    #[error("maze dimensions must be positive (received {rows}x{columns})")]
    EmptyDimension {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
}

/// Fixed-shape, row-major grid of maze cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Creates a grid of the requested shape with every cell set to `cell`.
    pub fn filled(rows: u32, columns: u32, cell: Cell) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::EmptyDimension { rows, columns });
        }

        let len = rows as usize * columns as usize;
        Ok(Self {
            rows,
            columns,
            cells: vec![cell; len],
        })
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Flat index of the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }

    /// Coordinate addressed by the flat index, if it lies inside the grid.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() {
            return None;
        }
        let columns = self.columns as usize;
        let column = u32::try_from(index % columns).ok()?;
        let row = u32::try_from(index / columns).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// State of the cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether the cell lies inside the grid and is open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(Cell::is_open)
    }

    /// Overwrites a cell. Returns `false` when the coordinate is outside the grid.
    pub fn set(&mut self, cell: CellCoord, value: Cell) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = value;
                true
            }
            None => false,
        }
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of a single row, or `None` past the last row.
    #[must_use]
    pub fn row(&self, row: u32) -> Option<&[Cell]> {
        if row >= self.rows {
            return None;
        }
        let width = self.columns as usize;
        let start = row as usize * width;
        Some(&self.cells[start..start + width])
    }

    /// Number of open cells.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_open()).count()
    }

    /// Cell `distance` steps away in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(
        &self,
        cell: CellCoord,
        direction: Direction,
        distance: u32,
    ) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let distance = i64::from(distance);
        let column = i64::from(cell.column()) + dx * distance;
        let row = i64::from(cell.row()) + dy * distance;
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        let candidate = CellCoord::new(column, row);
        self.contains(candidate).then_some(candidate)
    }

    /// Adjacent cell in `direction`, wrapping around to the opposite edge.
    #[must_use]
    pub fn wrapping_neighbor(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        let (dx, dy) = direction.delta();
        let column = (i64::from(cell.column()) + dx).rem_euclid(i64::from(self.columns));
        let row = (i64::from(cell.row()) + dy).rem_euclid(i64::from(self.rows));
        // rem_euclid keeps both values inside 0..dimension, which always fits u32.
        CellCoord::new(column as u32, row as u32)
    }

    /// Goal cell located in the bottom-right corner.
    #[must_use]
    pub const fn goal(&self) -> Goal {
        Goal::at(CellCoord::new(self.columns - 1, self.rows - 1))
    }
}

/// Canonical representation of the cell the actor must reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Goal {
    cell: CellCoord,
}

impl Goal {
    /// Creates a goal anchored at the provided cell coordinate.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self { cell }
    }

    /// Returns the cell that defines the goal.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

/// Player-controlled actor walking through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Actor {
    /// Cell currently occupied by the actor.
    pub position: CellCoord,
    /// Direction used on the next advance.
    pub facing: Direction,
}

impl Actor {
    /// Actor as placed at the start of every game and level.
    #[must_use]
    pub const fn spawn() -> Self {
        Self {
            position: CellCoord::ORIGIN,
            facing: Direction::Right,
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::spawn()
    }
}

/// Level, tick interval and score of the running game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelProgress {
    level: u32,
    speed_millis: f64,
    base_speed_millis: f64,
    score: u64,
}

impl LevelProgress {
    /// Progress at the start of a game played with the provided base interval.
    ///
    /// Intervals shorter than [`MIN_SPEED_MS`] are raised to it.
    #[must_use]
    pub fn starting(base_speed: Duration) -> Self {
        let base_speed_millis = (base_speed.as_secs_f64() * 1_000.0).max(MIN_SPEED_MS);
        Self {
            level: 1,
            speed_millis: base_speed_millis,
            base_speed_millis,
            score: 0,
        }
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Interval between ticks on the current level.
    #[must_use]
    pub fn speed(&self) -> Duration {
        millis_to_duration(self.speed_millis)
    }

    /// Interval between ticks on the current level, in fractional milliseconds.
    #[must_use]
    pub const fn speed_millis(&self) -> f64 {
        self.speed_millis
    }

    /// Interval between ticks on level 1.
    #[must_use]
    pub fn base_speed(&self) -> Duration {
        millis_to_duration(self.base_speed_millis)
    }

    /// Points awarded for a tick at the current speed: `floor(10 * base / speed)`.
    #[must_use]
    pub fn points_per_tick(&self) -> u64 {
        (BASE_POINTS_PER_TICK * (self.base_speed_millis / self.speed_millis)).floor() as u64
    }

    /// Adds one tick worth of points and returns the new score.
    pub fn award_tick(&mut self) -> u64 {
        self.score = self.score.saturating_add(self.points_per_tick());
        self.score
    }

    /// Moves to the next level and shortens the tick interval.
    ///
    /// The interval never drops below [`MIN_SPEED_MS`].
    pub fn advance_level(&mut self) {
        self.level = self.level.saturating_add(1);
        self.speed_millis = (self.speed_millis * LEVEL_SPEED_FACTOR).max(MIN_SPEED_MS);
    }

    /// Returns to level 1 at the base interval with zero score.
    pub fn reset(&mut self) {
        self.level = 1;
        self.speed_millis = self.base_speed_millis;
        self.score = 0;
    }
}

fn millis_to_duration(millis: f64) -> Duration {
    Duration::from_nanos((millis * 1_000_000.0).round() as u64)
}

/// Behaviour when the actor faces the edge of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPolicy {
    /// The border acts as a soft wall: the actor stays in place, unpunished.
    #[default]
    Block,
    /// The actor re-enters from the opposite edge.
    Wrap,
}

/// Handling of goals that the carve did not connect to the start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalPolicy {
    /// Keep the maze exactly as carved; some levels may be unsolvable.
    #[default]
    AsCarved,
    /// Open a corridor to the goal when it is unreachable from the start.
    Connected,
}

/// Error returned when parsing a policy name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} policy `{value}` (expected one of: {expected})")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for BorderPolicy {
    type Err = ParsePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(Self::Block),
            "wrap" => Ok(Self::Wrap),
            _ => Err(ParsePolicyError {
                kind: "border",
                value: value.to_owned(),
                expected: "block, wrap",
            }),
        }
    }
}

impl FromStr for GoalPolicy {
    type Err = ParsePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "as-carved" | "as_carved" => Ok(Self::AsCarved),
            "connected" => Ok(Self::Connected),
            _ => Err(ParsePolicyError {
                kind: "goal",
                value: value.to_owned(),
                expected: "as-carved, connected",
            }),
        }
    }
}

/// Reasons a game configuration may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The maze shape is unusable.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The base tick interval must be positive.
    #[error("base speed must be at least one millisecond")]
    NonPositiveSpeed,
}

/// Tunable parameters of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of maze rows.
    pub rows: u32,
    /// Number of maze columns.
    pub columns: u32,
    /// Tick interval on level 1, in milliseconds.
    pub base_speed_ms: u64,
    /// Behaviour at the grid edge.
    pub border_policy: BorderPolicy,
    /// Handling of unreachable goals.
    pub goal_policy: GoalPolicy,
    /// Seed for reproducible mazes; `None` draws from system entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Tick interval on level 1.
    #[must_use]
    pub const fn base_speed(&self) -> Duration {
        Duration::from_millis(self.base_speed_ms)
    }

    /// Checks that the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GridError::EmptyDimension {
                rows: self.rows,
                columns: self.columns,
            }
            .into());
        }
        if self.base_speed_ms == 0 {
            return Err(ConfigError::NonPositiveSpeed);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            base_speed_ms: DEFAULT_BASE_SPEED_MS,
            border_policy: BorderPolicy::default(),
            goal_policy: GoalPolicy::default(),
            seed: None,
        }
    }
}
