//! Drives the world, the tick scheduler and input translation for one game.

use std::time::Duration;

use hamster_maze_core::{Command, Event};
use hamster_maze_rendering::{cues_for, FrameInput, Scene};
use hamster_maze_system_input::Input;
use hamster_maze_system_tick_scheduler::TickScheduler;
use hamster_maze_world::{self as world, query, World};

/// Owns a running game and advances it one rendered frame at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    scheduler: TickScheduler,
    input: Input,
}

impl Simulation {
    /// Starts the scheduler at the world's current speed.
    pub(crate) fn new(world: World) -> Self {
        let mut scheduler = TickScheduler::new();
        scheduler.start(query::progress(&world).speed());
        Self {
            world,
            scheduler,
            input: Input::new(),
        }
    }

    /// Snapshot of the current game for presentation.
    pub(crate) fn scene(&self) -> Scene {
        Scene::new(
            query::grid(&self.world),
            query::actor(&self.world),
            query::goal(&self.world),
            query::progress(&self.world),
        )
    }

    /// Applies one frame of input and elapsed time, returning every event produced.
    pub(crate) fn step(&mut self, dt: Duration, frame: &FrameInput) -> Vec<Event> {
        let mut commands = Vec::new();
        if frame.restart {
            commands.push(Command::Restart);
        }
        self.input.handle(&frame.inputs, &mut commands);
        commands.push(Command::Tick { dt });

        let mut log = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.scheduler.handle(&events, &mut commands);
            log.extend(events);
        }
        log
    }

    /// Advances the game and refreshes `scene`, queueing any presentation cues.
    pub(crate) fn update(&mut self, dt: Duration, frame: FrameInput, scene: &mut Scene) {
        let events = self.step(dt, &frame);
        cues_for(&events, &mut scene.cues);
        scene.refresh(
            query::grid(&self.world),
            query::actor(&self.world),
            query::goal(&self.world),
            query::progress(&self.world),
        );
    }
}
