#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Hamster Maze.

use hamster_maze_core::{
    Actor, BorderPolicy, Command, ConfigError, Direction, Event, GameConfig, Goal, LevelProgress,
    MazeGrid, Outcome, WELCOME_BANNER,
};
use hamster_maze_system_maze_generation::MazeGenerator;

/// Represents the authoritative Hamster Maze game state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    generator: MazeGenerator,
    grid: MazeGrid,
    goal: Goal,
    actor: Actor,
    progress: LevelProgress,
}

impl World {
    /// Creates a new game with the default configuration and an entropy-seeded maze.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default()).expect("default configuration is valid")
    }

    /// Creates a new game from the provided configuration.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut generator = generator_for(&config);
        let grid = generator.generate(config.rows, config.columns)?;
        Ok(Self::assemble(config, generator, grid))
    }

    /// Creates a new game whose first level is played on `grid`.
    ///
    /// The grid's shape overrides the configured rows and columns; later levels
    /// are generated with the same shape.
    pub fn with_maze(mut config: GameConfig, grid: MazeGrid) -> Result<Self, ConfigError> {
        config.rows = grid.rows();
        config.columns = grid.columns();
        config.validate()?;
        let generator = generator_for(&config);
        Ok(Self::assemble(config, generator, grid))
    }

    fn assemble(config: GameConfig, generator: MazeGenerator, grid: MazeGrid) -> Self {
        Self {
            banner: WELCOME_BANNER,
            goal: grid.goal(),
            actor: Actor::spawn(),
            progress: LevelProgress::starting(config.base_speed()),
            config,
            generator,
            grid,
        }
    }

    /// Records the facing used by the next advance.
    ///
    /// Any direction is accepted at any time, including one that points into a
    /// wall or back the way the actor came.
    pub fn set_direction(&mut self, direction: Direction) {
        self.actor.facing = direction;
    }

    /// Moves the actor one cell along its facing and applies the consequences.
    pub fn advance(&mut self, out_events: &mut Vec<Event>) -> Outcome {
        let from = self.actor.position;
        let facing = self.actor.facing;
        let candidate = match self.config.border_policy {
            BorderPolicy::Block => self.grid.neighbor(from, facing, 1),
            // On a single row or column the wrapped neighbour is the actor's own cell.
            BorderPolicy::Wrap => Some(self.grid.wrapping_neighbor(from, facing))
                .filter(|&cell| cell != from),
        };

        let outcome = match candidate {
            None => {
                out_events.push(Event::BlockedAtBorder { cell: from, facing });
                Outcome::BlockedAtBorder
            }
            Some(cell) if !self.grid.is_open(cell) => {
                let final_score = self.progress.score();
                log::info!("hit the wall at {cell} on level {}", self.progress.level());
                self.progress.reset();
                out_events.push(Event::Collided { cell, final_score });
                self.respawn(out_events);
                out_events.push(Event::SpeedChanged {
                    speed: self.progress.speed(),
                });
                out_events.push(Event::ScoreChanged {
                    score: self.progress.score(),
                });
                Outcome::Collided
            }
            Some(cell) => {
                self.actor.position = cell;
                out_events.push(Event::ActorMoved {
                    from,
                    to: cell,
                    facing,
                });

                if cell == self.goal.cell() {
                    self.progress.advance_level();
                    log::info!(
                        "level {} reached, ticking every {:?}",
                        self.progress.level(),
                        self.progress.speed()
                    );
                    out_events.push(Event::GoalReached {
                        level: self.progress.level(),
                    });
                    self.respawn(out_events);
                    out_events.push(Event::SpeedChanged {
                        speed: self.progress.speed(),
                    });
                    let score = self.progress.award_tick();
                    out_events.push(Event::ScoreChanged { score });
                    Outcome::GoalReached
                } else {
                    let score = self.progress.award_tick();
                    out_events.push(Event::ScoreChanged { score });
                    Outcome::Moved
                }
            }
        };

        out_events.push(Event::Advanced { outcome });
        outcome
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.progress.reset();
        self.respawn(out_events);
        out_events.push(Event::SpeedChanged {
            speed: self.progress.speed(),
        });
        out_events.push(Event::ScoreChanged {
            score: self.progress.score(),
        });
    }

    fn respawn(&mut self, out_events: &mut Vec<Event>) {
        self.actor = Actor::spawn();
        match self.generator.generate(self.grid.rows(), self.grid.columns()) {
            Ok(grid) => {
                log::debug!(
                    "generated a {}x{} maze with {} open cells",
                    grid.rows(),
                    grid.columns(),
                    grid.open_count()
                );
                self.goal = grid.goal();
                self.grid = grid;
                out_events.push(Event::MazeRegenerated);
            }
            Err(error) => log::error!("keeping the previous maze: {error}"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn generator_for(config: &GameConfig) -> MazeGenerator {
    let generator = match config.seed {
        Some(seed) => MazeGenerator::from_seed(seed),
        None => MazeGenerator::from_entropy(),
    };
    generator.with_goal_policy(config.goal_policy)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetDirection { direction } => {
            world.set_direction(direction);
            out_events.push(Event::DirectionChanged { direction });
        }
        Command::Advance => {
            let _ = world.advance(out_events);
        }
        Command::Restart => {
            world.restart(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use hamster_maze_core::{Actor, GameConfig, Goal, LevelProgress, MazeGrid};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the current maze.
    #[must_use]
    pub fn grid(world: &World) -> &MazeGrid {
        &world.grid
    }

    /// Captures the actor's position and facing.
    #[must_use]
    pub fn actor(world: &World) -> Actor {
        world.actor
    }

    /// Goal of the current maze.
    #[must_use]
    pub fn goal(world: &World) -> Goal {
        world.goal
    }

    /// Level, tick interval and score of the running game.
    #[must_use]
    pub fn progress(world: &World) -> &LevelProgress {
        &world.progress
    }

    /// Configuration the game was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Reports whether the current goal can be reached from the start.
    #[must_use]
    pub fn is_goal_reachable(world: &World) -> bool {
        hamster_maze_system_maze_generation::is_goal_reachable(&world.grid)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use hamster_maze_core::{Cell, CellCoord};

    fn seeded_config(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    fn open_maze(rows: u32, columns: u32) -> MazeGrid {
        MazeGrid::filled(rows, columns, Cell::Open).expect("valid grid")
    }

    #[test]
    fn actor_walks_the_starting_corridor() {
        let mut world = World::with_config(seeded_config(17)).expect("valid config");
        let mut events = Vec::new();

        for _ in 0..4 {
            assert_eq!(world.advance(&mut events), Outcome::Moved);
        }

        assert_eq!(query::actor(&world).position, CellCoord::new(4, 0));
        assert_eq!(query::progress(&world).score(), 40);
    }

    #[test]
    fn border_blocks_without_penalty() {
        let mut world = World::with_maze(seeded_config(1), open_maze(10, 10)).expect("valid maze");
        let mut events = Vec::new();
        for _ in 0..9 {
            assert_eq!(world.advance(&mut events), Outcome::Moved);
        }
        assert_eq!(query::actor(&world).position, CellCoord::new(9, 0));
        let score = query::progress(&world).score();

        events.clear();
        assert_eq!(world.advance(&mut events), Outcome::BlockedAtBorder);
        assert_eq!(world.advance(&mut events), Outcome::BlockedAtBorder);

        assert_eq!(query::actor(&world).position, CellCoord::new(9, 0));
        assert_eq!(query::progress(&world).score(), score);
        assert_eq!(query::progress(&world).level(), 1);
        assert!(events.contains(&Event::BlockedAtBorder {
            cell: CellCoord::new(9, 0),
            facing: Direction::Right,
        }));
    }

    #[test]
    fn goal_advances_level_and_speeds_up() {
        let mut world = World::with_maze(seeded_config(2), open_maze(2, 2)).expect("valid maze");
        let mut events = Vec::new();

        assert_eq!(world.advance(&mut events), Outcome::Moved);
        world.set_direction(Direction::Down);
        assert_eq!(world.advance(&mut events), Outcome::GoalReached);

        let progress = query::progress(&world);
        assert_eq!(progress.level(), 2);
        assert!((progress.speed_millis() - 450.0).abs() < 1e-9);
        assert_eq!(progress.score(), 10 + 11);
        assert_eq!(query::actor(&world), Actor::spawn());
        assert!(events.contains(&Event::GoalReached { level: 2 }));
        assert!(events.contains(&Event::MazeRegenerated));
        assert_eq!(query::grid(&world).rows(), 2);
        assert_eq!(query::grid(&world).columns(), 2);
    }

    #[test]
    fn collision_resets_the_game() {
        let mut grid = open_maze(3, 3);
        let _ = grid.set(CellCoord::new(0, 1), Cell::Wall);
        let mut world = World::with_maze(seeded_config(3), grid).expect("valid maze");
        let mut events = Vec::new();

        assert_eq!(world.advance(&mut events), Outcome::Moved);
        world.set_direction(Direction::Left);
        assert_eq!(world.advance(&mut events), Outcome::Moved);
        world.set_direction(Direction::Down);
        events.clear();
        assert_eq!(world.advance(&mut events), Outcome::Collided);

        let progress = query::progress(&world);
        assert_eq!(progress.score(), 0);
        assert_eq!(progress.level(), 1);
        assert_eq!(progress.speed(), Duration::from_millis(500));
        assert_eq!(query::actor(&world), Actor::spawn());
        assert!(events.contains(&Event::Collided {
            cell: CellCoord::new(0, 1),
            final_score: 20,
        }));
        assert_eq!(events.last(), Some(&Event::Advanced { outcome: Outcome::Collided }));
    }

    #[test]
    fn collision_after_level_up_restores_base_speed() {
        let mut world = World::with_maze(seeded_config(4), open_maze(2, 2)).expect("valid maze");
        let mut events = Vec::new();
        assert_eq!(world.advance(&mut events), Outcome::Moved);
        world.set_direction(Direction::Down);
        assert_eq!(world.advance(&mut events), Outcome::GoalReached);
        assert_eq!(query::progress(&world).level(), 2);

        // A generated 2x2 maze has no room to carve, so (row 1, column 0) stays walled.
        assert!(!query::grid(&world).is_open(CellCoord::new(0, 1)));
        world.set_direction(Direction::Down);
        assert_eq!(world.advance(&mut events), Outcome::Collided);
        assert_eq!(query::progress(&world).level(), 1);
        assert_eq!(query::progress(&world).score(), 0);
        assert_eq!(query::progress(&world).speed(), Duration::from_millis(500));
    }

    #[test]
    fn wrap_policy_teleports_to_opposite_edge() {
        let config = GameConfig {
            border_policy: BorderPolicy::Wrap,
            ..seeded_config(5)
        };
        let mut world = World::with_maze(config, open_maze(3, 3)).expect("valid maze");
        let mut events = Vec::new();

        world.set_direction(Direction::Left);
        assert_eq!(world.advance(&mut events), Outcome::Moved);
        assert_eq!(query::actor(&world).position, CellCoord::new(2, 0));

        world.set_direction(Direction::Up);
        assert_eq!(world.advance(&mut events), Outcome::GoalReached);
    }

    #[test]
    fn wrap_along_a_single_row_axis_is_blocked() {
        let config = GameConfig {
            border_policy: BorderPolicy::Wrap,
            ..seeded_config(5)
        };
        let mut world = World::with_maze(config, open_maze(1, 4)).expect("valid maze");
        let mut events = Vec::new();

        world.set_direction(Direction::Up);
        assert_eq!(world.advance(&mut events), Outcome::BlockedAtBorder);
        world.set_direction(Direction::Down);
        assert_eq!(world.advance(&mut events), Outcome::BlockedAtBorder);
        assert_eq!(query::actor(&world).position, CellCoord::new(0, 0));
        assert_eq!(query::progress(&world).score(), 0);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ActorMoved { .. })));

        world.set_direction(Direction::Left);
        assert_eq!(world.advance(&mut events), Outcome::GoalReached);
    }

    #[test]
    fn apply_routes_commands() {
        let mut world = World::with_config(seeded_config(6)).expect("valid config");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetDirection {
                direction: Direction::Down,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: Duration::from_millis(16)
                },
                Event::DirectionChanged {
                    direction: Direction::Down
                },
            ]
        );
        assert_eq!(query::actor(&world).facing, Direction::Down);

        events.clear();
        apply(&mut world, Command::Restart, &mut events);
        assert_eq!(query::actor(&world), Actor::spawn());
        assert!(events.contains(&Event::MazeRegenerated));
        assert!(events.contains(&Event::ScoreChanged { score: 0 }));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = GameConfig {
            base_speed_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            World::with_config(config).err(),
            Some(ConfigError::NonPositiveSpeed)
        );
    }
}
