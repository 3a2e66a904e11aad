use std::time::Duration;

use hamster_maze_core::{
    Actor, BorderPolicy, Direction, Event, GameConfig, GoalPolicy, LevelProgress, Outcome,
    LEVEL_SPEED_FACTOR, MIN_SPEED_MS,
};
use hamster_maze_world::{query, World};

const SHAPES: [(u32, u32); 4] = [(2, 2), (4, 6), (6, 6), (10, 10)];

#[test]
fn every_outcome_follows_the_game_rules() {
    for border_policy in [BorderPolicy::Block, BorderPolicy::Wrap] {
        for (rows, columns) in SHAPES {
            for seed in 0..8 {
                let config = GameConfig {
                    rows,
                    columns,
                    border_policy,
                    goal_policy: GoalPolicy::Connected,
                    seed: Some(seed),
                    ..GameConfig::default()
                };
                play(config, seed as usize);
            }
        }
    }
}

fn play(config: GameConfig, salt: usize) {
    let mut world = World::with_config(config).expect("valid config");
    let mut events = Vec::new();

    for step in 0..300 {
        let direction = Direction::ALL[(step * 7 + salt + step / 5) % Direction::ALL.len()];
        world.set_direction(direction);

        let before_actor = query::actor(&world);
        let before: LevelProgress = *query::progress(&world);
        events.clear();
        let outcome = world.advance(&mut events);
        let actor = query::actor(&world);
        let progress = query::progress(&world);

        assert!(query::grid(&world).contains(actor.position));
        assert_eq!(events.last(), Some(&Event::Advanced { outcome }));

        match outcome {
            Outcome::BlockedAtBorder => {
                let degenerate = config.rows == 1 || config.columns == 1;
                assert!(config.border_policy == BorderPolicy::Block || degenerate);
                assert_eq!(actor, before_actor);
                assert_eq!(*progress, before);
            }
            Outcome::Moved => {
                let distance = actor.position.manhattan_distance(before_actor.position);
                let wrapped = distance == config.columns - 1 || distance == config.rows - 1;
                assert!(distance == 1 || (config.border_policy == BorderPolicy::Wrap && wrapped));
                assert_eq!(progress.score(), before.score() + before.points_per_tick());
                assert_eq!(progress.level(), before.level());
            }
            Outcome::Collided => {
                assert_eq!(actor, Actor::spawn());
                assert_eq!(progress.score(), 0);
                assert_eq!(progress.level(), 1);
                assert_eq!(progress.speed(), config.base_speed());
                assert!(events.contains(&Event::MazeRegenerated));
            }
            Outcome::GoalReached => {
                assert_eq!(actor, Actor::spawn());
                assert_eq!(progress.level(), before.level() + 1);
                let expected = (before.speed_millis() * LEVEL_SPEED_FACTOR).max(MIN_SPEED_MS);
                assert!((progress.speed_millis() - expected).abs() < 1e-9);
                assert!(progress.speed() >= Duration::from_millis(1));
                assert_eq!(progress.score(), before.score() + progress.points_per_tick());
                assert!(events.contains(&Event::MazeRegenerated));
            }
        }
    }
}
