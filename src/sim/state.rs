//! Game state and core simulation types
//!
//! Positions are screen-space with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, waiting for the first tap
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended (collision or fell out of bounds), waiting for restart
    Paused,
}

/// The player's drone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub pos: Vec2,
}

impl Default for Drone {
    fn default() -> Self {
        Self {
            pos: Vec2::new(DRONE_START_X, DRONE_START_Y),
        }
    }
}

impl Drone {
    /// Sprite size (not used for collision)
    pub const SIZE: Vec2 = Vec2::splat(DRONE_SIZE);

    /// Fall one gravity step
    pub fn apply_gravity(&mut self) {
        self.pos.y += GRAVITY_STEP;
    }

    /// Jump up one boost step
    pub fn boost(&mut self) {
        self.pos.y -= BOOST_STEP;
    }
}

/// The scrolling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub pos: Vec2,
}

impl Default for Building {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BUILDING_START_X, BUILDING_START_Y),
        }
    }
}

impl Building {
    pub const SIZE: Vec2 = Vec2::new(BUILDING_WIDTH, BUILDING_HEIGHT);

    /// Whether the building has left the screen on the left
    pub fn is_past_left_edge(&self) -> bool {
        self.pos.x <= 0.0
    }

    /// Send the building back to the right edge at a new height
    pub fn recycle(&mut self, y: f32) {
        self.pos = Vec2::new(BUILDING_RECYCLE_X, y);
    }
}

/// Everything a run mutates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    pub drone: Drone,
    pub building: Building,
    /// Physics ticks survived this run. The score is derived from it so
    /// that whole seconds land exactly on whole points.
    pub ticks: u64,
}

impl EntityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new run after a loss.
    ///
    /// Only the building's x is reset, to the recycle point; it keeps the
    /// height it had when the run ended.
    pub fn reset_for_restart(&mut self) {
        self.ticks = 0;
        self.drone = Drone::default();
        self.building.pos.x = BUILDING_RECYCLE_X;
    }

    /// Current score (1 point per second of play)
    pub fn score(&self) -> f64 {
        self.ticks as f64 * SCORE_PER_TICK
    }

    /// Integer score shown to the player
    pub fn display_score(&self) -> u32 {
        self.score() as u32
    }
}
