//! Periodic timers
//!
//! The game core never sleeps or reads the wall clock itself. It registers
//! periodic timers on a [`Scheduler`] and the host pulls due ticks out of it,
//! one at a time, handling each to completion before asking for the next.

use std::time::Duration;

/// Which periodic source produced a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSource {
    /// Fixed-rate tick: gravity, scoring, collision and bounds checks
    Physics,
    /// Variable-rate tick: obstacle scroll and difficulty recomputation
    Difficulty,
}

/// Opaque handle to a registered periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A single delivered tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub handle: TimerHandle,
    pub source: TickSource,
    /// Scheduler time at which the tick fired
    pub at: Duration,
}

/// Source of periodic ticks.
///
/// Implementations must deliver ticks in due-time order, breaking ties by
/// registration order, and must never deliver a tick for a cancelled handle.
pub trait Scheduler {
    /// Register a periodic timer; its first tick is due `interval` from now.
    fn register_periodic(&mut self, interval: Duration, source: TickSource) -> TimerHandle;

    /// Cancel a timer. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Pop the earliest tick due at or before `until`, moving the clock to it.
    ///
    /// Returns `None` (and moves the clock to `until`) when nothing is due.
    fn next_due(&mut self, until: Duration) -> Option<Tick>;

    /// Current scheduler time
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    source: TickSource,
    interval: Duration,
    next_at: Duration,
}

/// Virtual-time scheduler driven explicitly by the host.
///
/// Tests advance it by exact amounts; the native host advances it by
/// measured wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    timers: Vec<Timer>,
    next_handle: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timers
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Interval of a live timer, if the handle is still registered
    pub fn interval_of(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.interval)
    }
}

impl Scheduler for ManualScheduler {
    fn register_periodic(&mut self, interval: Duration, source: TickSource) -> TimerHandle {
        // A zero period would never let the clock move forward
        let interval = interval.max(Duration::from_millis(1));
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            source,
            interval,
            next_at: self.now + interval,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }

    fn next_due(&mut self, until: Duration) -> Option<Tick> {
        // Handles grow monotonically, so (next_at, handle) orders ties by registration
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_at <= until)
            .min_by_key(|t| (t.next_at, t.handle));

        match timer {
            Some(timer) => {
                let at = timer.next_at;
                timer.next_at += timer.interval;
                self.now = self.now.max(at);
                Some(Tick {
                    handle: timer.handle,
                    source: timer.source,
                    at,
                })
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_tick_is_one_interval_out() {
        let mut sched = ManualScheduler::new();
        sched.register_periodic(ms(100), TickSource::Physics);

        assert!(sched.next_due(ms(99)).is_none());
        assert_eq!(sched.now(), ms(99));

        let tick = sched.next_due(ms(100)).expect("tick due at 100ms");
        assert_eq!(tick.source, TickSource::Physics);
        assert_eq!(tick.at, ms(100));
    }

    #[test]
    fn test_ties_follow_registration_order() {
        let mut sched = ManualScheduler::new();
        sched.register_periodic(ms(100), TickSource::Physics);
        sched.register_periodic(ms(100), TickSource::Difficulty);

        let first = sched.next_due(ms(100)).unwrap();
        let second = sched.next_due(ms(100)).unwrap();
        assert_eq!(first.source, TickSource::Physics);
        assert_eq!(second.source, TickSource::Difficulty);
        assert!(sched.next_due(ms(100)).is_none());
    }

    #[test]
    fn test_interleaves_by_due_time() {
        let mut sched = ManualScheduler::new();
        sched.register_periodic(ms(100), TickSource::Physics);
        sched.register_periodic(ms(40), TickSource::Difficulty);

        let mut order = Vec::new();
        while let Some(tick) = sched.next_due(ms(200)) {
            order.push((tick.source, tick.at));
        }
        assert_eq!(
            order,
            vec![
                (TickSource::Difficulty, ms(40)),
                (TickSource::Difficulty, ms(80)),
                (TickSource::Physics, ms(100)),
                (TickSource::Difficulty, ms(120)),
                (TickSource::Difficulty, ms(160)),
                (TickSource::Physics, ms(200)),
                (TickSource::Difficulty, ms(200)),
            ]
        );
    }

    #[test]
    fn test_cancel_drops_pending_ticks() {
        let mut sched = ManualScheduler::new();
        let handle = sched.register_periodic(ms(100), TickSource::Difficulty);
        sched.cancel(handle);
        assert!(sched.next_due(ms(1000)).is_none());
        assert_eq!(sched.active_timers(), 0);

        // Cancelling twice is harmless
        sched.cancel(handle);
    }

    #[test]
    fn test_registration_phase_starts_at_now() {
        let mut sched = ManualScheduler::new();
        assert!(sched.next_due(ms(250)).is_none());

        let handle = sched.register_periodic(ms(60), TickSource::Difficulty);
        assert_eq!(sched.interval_of(handle), Some(ms(60)));
        let tick = sched.next_due(ms(1000)).unwrap();
        assert_eq!(tick.at, ms(310));
    }
}
