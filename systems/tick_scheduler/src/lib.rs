#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick scheduler that turns elapsed wall-clock time into actor advances.

use std::{ops::ControlFlow, time::Duration};

use hamster_maze_core::{Command, Event};

/// Shortest interval the scheduler will register.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Pure system that fires one advance per elapsed interval.
///
/// The scheduler behaves like a single repeating timer. Registering a new
/// interval discards any partially elapsed period, so a speed change takes
/// effect starting with the next tick.
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    accumulator: Duration,
    running: bool,
}

impl TickScheduler {
    /// Creates a stopped scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: MIN_INTERVAL,
            accumulator: Duration::ZERO,
            running: false,
        }
    }

    /// Registers the timer with the provided interval and starts ticking.
    pub fn start(&mut self, interval: Duration) {
        self.running = true;
        self.register(interval);
    }

    /// Halts further ticks until the scheduler is started again.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    /// Replaces the interval, restarting the current period.
    pub fn reschedule(&mut self, interval: Duration) {
        self.register(interval);
    }

    /// Reports whether ticks are currently being produced.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Interval between two ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Consumes world events and emits one advance per elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } if self.running => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                Event::SpeedChanged { speed } => self.reschedule(*speed),
                _ => {}
            }
        }

        for _ in 0..self.resolve_ticks() {
            out.push(Command::Advance);
        }
    }

    /// Runs the timer for `elapsed`, invoking `on_tick` at every interval.
    ///
    /// `interval_provider` is consulted after each tick; when it reports a new
    /// interval the timer is registered again from that tick. Returning
    /// [`ControlFlow::Break`] from `on_tick` stops the scheduler. Returns the
    /// number of ticks fired.
    pub fn run_for<P, F>(
        &mut self,
        elapsed: Duration,
        mut interval_provider: P,
        mut on_tick: F,
    ) -> usize
    where
        P: FnMut() -> Duration,
        F: FnMut() -> ControlFlow<()>,
    {
        if !self.running {
            return 0;
        }

        let mut remaining = elapsed;
        let mut fired = 0;
        while self.running {
            let until_tick = self.interval.saturating_sub(self.accumulator);
            if remaining < until_tick {
                self.accumulator += remaining;
                break;
            }
            remaining -= until_tick;
            self.accumulator = Duration::ZERO;
            fired += 1;

            if on_tick().is_break() {
                self.stop();
                break;
            }

            let next = interval_provider().max(MIN_INTERVAL);
            if next != self.interval {
                self.reschedule(next);
            }
        }
        fired
    }

    fn register(&mut self, interval: Duration) {
        let interval = interval.max(MIN_INTERVAL);
        if interval != self.interval {
            log::debug!("tick interval changed from {:?} to {interval:?}", self.interval);
        }
        self.interval = interval;
        self.accumulator = Duration::ZERO;
    }

    fn resolve_ticks(&mut self) -> usize {
        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
