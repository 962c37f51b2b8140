//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (periodic timer registration and delivery)
//!
//! Storage lives in `crate::persistence`.

pub mod time;

pub use time::{ManualScheduler, Scheduler, Tick, TickSource, TimerHandle};
