#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hamster Maze adapters.

use std::{error::Error, f32::consts::FRAC_PI_2, fmt, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use hamster_maze_core::{Actor, Cell, CellCoord, Direction, Event, Goal, LevelProgress, MazeGrid};
use hamster_maze_system_input::InputEvent;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB values of the color, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors used to draw the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Passable floor.
    pub floor: Color,
    /// Impassable wall.
    pub wall: Color,
    /// Goal cell.
    pub goal: Color,
    /// The hamster.
    pub actor: Color,
    /// Score and level text.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            floor: Color::from_rgb_u8(0xf4, 0xe9, 0xd8),
            wall: Color::from_rgb_u8(0x6b, 0x4f, 0x3a),
            goal: Color::from_rgb_u8(0xe0, 0xb0, 0x2f),
            actor: Color::from_rgb_u8(0xc8, 0x7f, 0x3a),
            text: Color::from_rgb_u8(0xff, 0xff, 0xff),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Keys and gestures captured since the previous frame, in order.
    pub inputs: Vec<InputEvent>,
    /// Whether the player asked for a new game on this frame.
    pub restart: bool,
}

/// Transform applied to the hamster sprite so it faces its heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
    /// Clockwise rotation in radians, with y growing downwards.
    pub rotation: f32,
    /// Whether the sprite is mirrored horizontally before drawing.
    pub flip_horizontal: bool,
}

impl Heading {
    /// Transform for an actor facing `direction`.
    ///
    /// Sprites are drawn facing right. Facing left mirrors the sprite rather
    /// than rotating it.
    #[must_use]
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Right => Self::rotated(0.0),
            Direction::Down => Self::rotated(FRAC_PI_2),
            Direction::Up => Self::rotated(-FRAC_PI_2),
            Direction::Left => Self {
                rotation: 0.0,
                flip_horizontal: true,
            },
        }
    }

    fn rotated(rotation: f32) -> Self {
        Self {
            rotation,
            flip_horizontal: false,
        }
    }
}

/// Describes how the actor should be presented.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Cell occupied by the actor.
    pub cell: CellCoord,
    /// Direction the actor faces.
    pub facing: Direction,
    /// Sprite transform derived from the facing.
    pub heading: Heading,
}

impl From<Actor> for ActorPresentation {
    fn from(actor: Actor) -> Self {
        Self {
            cell: actor.position,
            facing: actor.facing,
            heading: Heading::for_direction(actor.facing),
        }
    }
}

/// Audio and dialog cues adapters should play in response to game events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Short failure sound played on collision.
    FailureSound,
    /// Pause the ambient track.
    PauseAmbient,
    /// Rewind the ambient track to its beginning.
    RewindAmbient,
    /// Blocking message shown to the player.
    Alert(String),
}

/// Derives presentation cues from world events, in event order.
pub fn cues_for(events: &[Event], out: &mut Vec<Cue>) {
    for event in events {
        match event {
            Event::Collided { final_score, .. } => {
                out.push(Cue::FailureSound);
                out.push(Cue::PauseAmbient);
                out.push(Cue::Alert(format!(
                    "Game Over! You hit a wall. Your score: {final_score}"
                )));
                out.push(Cue::RewindAmbient);
            }
            Event::GoalReached { .. } => out.push(Cue::Alert("Level Complete!".to_owned())),
            _ => {}
        }
    }
}

/// Text shown in the score display.
#[must_use]
pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

/// Edge length of a square tile so the whole maze fits the viewport.
///
/// Returns `floor(min(width, height) / max(rows, columns))`.
#[must_use]
pub fn tile_size(viewport: Vec2, rows: u32, columns: u32) -> u32 {
    let longest = rows.max(columns).max(1) as f32;
    let shortest_side = viewport.x.min(viewport.y).max(0.0);
    (shortest_side / longest).floor() as u32
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of maze rows.
    pub rows: u32,
    /// Number of maze columns.
    pub columns: u32,
    /// Maze cells in row-major order.
    pub tiles: Vec<Cell>,
    /// The hamster.
    pub actor: ActorPresentation,
    /// Cell the hamster must reach.
    pub goal: CellCoord,
    /// Current level.
    pub level: u32,
    /// Text for the score display.
    pub score_text: String,
    /// Cues raised since the previous frame; backends drain them.
    pub cues: Vec<Cue>,
}

impl Scene {
    /// Captures a snapshot of the game.
    #[must_use]
    pub fn new(grid: &MazeGrid, actor: Actor, goal: Goal, progress: &LevelProgress) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            tiles: grid.cells().to_vec(),
            actor: actor.into(),
            goal: goal.cell(),
            level: progress.level(),
            score_text: score_text(progress.score()),
            cues: Vec::new(),
        }
    }

    /// Replaces the snapshot while keeping any undelivered cues.
    pub fn refresh(
        &mut self,
        grid: &MazeGrid,
        actor: Actor,
        goal: Goal,
        progress: &LevelProgress,
    ) {
        let cues = std::mem::take(&mut self.cues);
        *self = Self::new(grid, actor, goal, progress);
        self.cues = cues;
    }

    /// Cell state at the provided coordinate, if it lies inside the scene.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Cell> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.tiles.get(index).copied()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Colors used to draw the scene.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hamster Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when laying out a scene.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewport cannot fit a single character per tile.
    ViewportTooSmall {
        /// Viewport width in backend units.
        width: u32,
        /// Viewport height in backend units.
        height: u32,
        /// Rows of the maze that must fit.
        rows: u32,
        /// Columns of the maze that must fit.
        columns: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewportTooSmall {
                width,
                height,
                rows,
                columns,
            } => write!(
                f,
                "a {width}x{height} viewport cannot show a maze of {rows} rows and {columns} columns"
            ),
        }
    }
}

impl Error for RenderingError {}
