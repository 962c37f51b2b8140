//! Game clock: the physics and difficulty tick sources
//!
//! Thin owner of the two timer handles on top of a [`Scheduler`].

use std::time::Duration;

use crate::consts::PHYSICS_INTERVAL;
use crate::platform::{Scheduler, Tick, TickSource, TimerHandle};

#[derive(Debug)]
pub struct GameClock<S: Scheduler> {
    scheduler: S,
    physics: Option<TimerHandle>,
    difficulty: Option<TimerHandle>,
    difficulty_interval: Option<Duration>,
}

impl<S: Scheduler> GameClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            physics: None,
            difficulty: None,
            difficulty_interval: None,
        }
    }

    /// Start both sources (physics at its fixed period). Restarts if running.
    pub fn start(&mut self, difficulty_interval: Duration) {
        self.stop();
        self.physics = Some(
            self.scheduler
                .register_periodic(PHYSICS_INTERVAL, TickSource::Physics),
        );
        self.register_difficulty(difficulty_interval);
    }

    /// Replace the difficulty source.
    ///
    /// Always restarts its phase, even when the interval is unchanged; the
    /// next difficulty tick is due `interval` from now.
    pub fn reconfigure(&mut self, interval: Duration) {
        if let Some(handle) = self.difficulty.take() {
            self.scheduler.cancel(handle);
        }
        self.register_difficulty(interval);
    }

    /// Cancel both sources. Nothing is delivered afterwards until `start`.
    pub fn stop(&mut self) {
        for handle in [self.physics.take(), self.difficulty.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
        self.difficulty_interval = None;
    }

    /// Next tick due at or before `until`, if any
    pub fn poll(&mut self, until: Duration) -> Option<TickSource> {
        while let Some(Tick { handle, source, .. }) = self.scheduler.next_due(until) {
            // Schedulers must not deliver cancelled handles; skip strays anyway
            if self.physics == Some(handle) || self.difficulty == Some(handle) {
                return Some(source);
            }
        }
        None
    }

    pub fn is_running(&self) -> bool {
        self.physics.is_some()
    }

    /// Current difficulty period (None while stopped)
    pub fn difficulty_interval(&self) -> Option<Duration> {
        self.difficulty_interval
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn register_difficulty(&mut self, interval: Duration) {
        self.difficulty = Some(
            self.scheduler
                .register_periodic(interval, TickSource::Difficulty),
        );
        self.difficulty_interval = Some(interval);
    }
}
