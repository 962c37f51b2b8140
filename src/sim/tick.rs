//! Per-tick rules
//!
//! Pure functions over [`EntityState`]. The session decides when to call
//! them and what to do with the outcome.

use rand::Rng;

use super::collision::collides;
use super::state::EntityState;
use crate::consts::*;

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsOutcome {
    /// Keep flying
    Continue,
    /// Drone hit the building
    Collided,
    /// Drone dropped below the bottom margin
    FellOut,
}

/// Where a drone height sits relative to the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Above the top edge; gets clamped
    AboveTop,
    Inside,
    /// Below `screen_height + FALL_MARGIN`; ends the run
    Lost,
}

/// Classify a drone height against the screen
#[inline]
pub fn bounds(y: f32, screen_height: f32) -> Bounds {
    if y > screen_height + FALL_MARGIN {
        Bounds::Lost
    } else if y < 0.0 {
        Bounds::AboveTop
    } else {
        Bounds::Inside
    }
}

/// Advance one physics tick: score, gravity, collision, bounds.
///
/// The top clamp is applied even when the step ends the run.
pub fn physics_step(state: &mut EntityState, screen_height: f32) -> PhysicsOutcome {
    state.ticks += 1;
    state.drone.apply_gravity();

    let mut outcome = PhysicsOutcome::Continue;
    if collides(state.drone.pos, state.building.pos) {
        outcome = PhysicsOutcome::Collided;
    }

    match bounds(state.drone.pos.y, screen_height) {
        Bounds::Lost if outcome == PhysicsOutcome::Continue => outcome = PhysicsOutcome::FellOut,
        Bounds::AboveTop => state.drone.pos.y = 0.0,
        _ => {}
    }

    outcome
}

/// Result of one obstacle step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleOutcome {
    Scrolled,
    /// Building returned to the right edge at this height
    Recycled { y: f32 },
}

/// Advance the building one difficulty tick
pub fn obstacle_step<R: Rng>(state: &mut EntityState, rng: &mut R) -> ObstacleOutcome {
    if state.building.is_past_left_edge() {
        let y = rng.random_range(0.0..BUILDING_MAX_Y);
        state.building.recycle(y);
        ObstacleOutcome::Recycled { y }
    } else {
        state.building.pos.x -= BUILDING_SCROLL_STEP;
        ObstacleOutcome::Scrolled
    }
}
