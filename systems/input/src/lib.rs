#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates raw keyboard and touch input into direction commands.

use glam::Vec2;
use hamster_maze_core::{Command, Direction};

/// Arrow keys recognised by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
}

impl Key {
    /// Direction selected by the key.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::ArrowUp => Direction::Up,
            Self::ArrowDown => Direction::Down,
            Self::ArrowLeft => Direction::Left,
            Self::ArrowRight => Direction::Right,
        }
    }
}

/// Raw input captured by an adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(Key),
    /// A touch gesture ended.
    Swipe {
        /// Screen position where the touch started, y growing downwards.
        start: Vec2,
        /// Screen position where the touch ended, y growing downwards.
        end: Vec2,
    },
}

impl InputEvent {
    /// Direction requested by the input, if any.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match *self {
            Self::Key(key) => Some(key.direction()),
            Self::Swipe { start, end } => swipe_direction(start, end),
        }
    }
}

/// Derives a direction from the dominant axis of a swipe.
///
/// Ties between the axes resolve horizontally. A swipe that did not move
/// counts as a swipe up. Non-finite positions yield `None`.
#[must_use]
pub fn swipe_direction(start: Vec2, end: Vec2) -> Option<Direction> {
    let delta = end - start;
    if !delta.is_finite() {
        return None;
    }

    let direction = if delta == Vec2::ZERO {
        Direction::Up
    } else if delta.x.abs() >= delta.y.abs() {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Pure system that turns captured input into `SetDirection` commands.
#[derive(Debug, Default)]
pub struct Input;

impl Input {
    /// Creates the input system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one direction command per recognised input, in capture order.
    pub fn handle(&mut self, inputs: &[InputEvent], out: &mut Vec<Command>) {
        out.extend(
            inputs
                .iter()
                .filter_map(InputEvent::direction)
                .map(|direction| Command::SetDirection { direction }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(Key::ArrowUp.direction(), Direction::Up);
        assert_eq!(Key::ArrowDown.direction(), Direction::Down);
        assert_eq!(Key::ArrowLeft.direction(), Direction::Left);
        assert_eq!(Key::ArrowRight.direction(), Direction::Right);
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        let origin = Vec2::new(100.0, 100.0);
        assert_eq!(
            swipe_direction(origin, Vec2::new(160.0, 120.0)),
            Some(Direction::Right)
        );
        assert_eq!(
            swipe_direction(origin, Vec2::new(40.0, 90.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            swipe_direction(origin, Vec2::new(110.0, 180.0)),
            Some(Direction::Down)
        );
        assert_eq!(
            swipe_direction(origin, Vec2::new(90.0, 20.0)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn swipe_ties_resolve_horizontally() {
        assert_eq!(
            swipe_direction(Vec2::ZERO, Vec2::new(-30.0, 30.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            swipe_direction(Vec2::ZERO, Vec2::new(30.0, -30.0)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn stationary_swipe_turns_up() {
        let point = Vec2::new(12.0, 7.0);
        assert_eq!(swipe_direction(point, point), Some(Direction::Up));

        let mut input = Input::new();
        let mut commands = Vec::new();
        input.handle(
            &[
                InputEvent::Key(Key::ArrowDown),
                InputEvent::Swipe {
                    start: point,
                    end: point,
                },
            ],
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![
                Command::SetDirection {
                    direction: Direction::Down
                },
                Command::SetDirection {
                    direction: Direction::Up
                },
            ]
        );
    }

    #[test]
    fn non_finite_swipe_is_ignored() {
        let end = Vec2::new(f32::NAN, 3.0);
        assert_eq!(swipe_direction(Vec2::ZERO, end), None);
        assert_eq!(
            InputEvent::Swipe {
                start: Vec2::ZERO,
                end,
            }
            .direction(),
            None
        );
    }
}
