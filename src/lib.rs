//! Robofly - a one-button drone arcade game
//!
//! Core modules:
//! - `sim`: Game rules (entities, collisions, difficulty, session state machine)
//! - `platform`: Host abstraction for periodic timers
//! - `persistence`: High score storage backends
//! - `highscores`: In-memory best score tracking
//! - `settings`: Host configuration

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use persistence::{JsonFileStore, MemoryStore, ScoreStore};
pub use settings::Settings;
pub use sim::{GameSession, HudView, SessionEvent, SessionPhase};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Physics tick period (gravity, scoring, collision checks)
    pub const PHYSICS_INTERVAL: Duration = Duration::from_millis(100);
    /// Difficulty tick period at the start of every run
    pub const BASE_DIFFICULTY_INTERVAL: Duration = Duration::from_millis(100);

    /// Score gained per physics tick (1 point per second)
    pub const SCORE_PER_TICK: f64 = 0.1;

    /// Downward displacement per physics tick
    pub const GRAVITY_STEP: f32 = 40.0;
    /// Upward displacement per tap
    pub const BOOST_STEP: f32 = 130.0;
    /// Leniency below the bottom edge before the drone counts as lost
    pub const FALL_MARGIN: f32 = 50.0;

    /// Drone defaults (10x10 blocks of 5 units)
    pub const DRONE_START_X: f32 = 100.0;
    pub const DRONE_START_Y: f32 = 100.0;
    pub const DRONE_SIZE: f32 = 50.0;

    /// Building defaults
    pub const BUILDING_START_X: f32 = 700.0;
    pub const BUILDING_START_Y: f32 = 300.0;
    pub const BUILDING_WIDTH: f32 = 20.0;
    pub const BUILDING_HEIGHT: f32 = 200.0;
    /// Leftward displacement per difficulty tick
    pub const BUILDING_SCROLL_STEP: f32 = 30.0;
    /// Off-screen x the building returns to after leaving the left edge
    pub const BUILDING_RECYCLE_X: f32 = 1000.0;
    /// Exclusive upper bound of the randomized building y
    pub const BUILDING_MAX_Y: f32 = 400.0;

    /// Collision half-extents. Tuned values, not derived from the sprite sizes.
    pub const DRONE_HALF_EXTENT: f32 = 25.0;
    pub const BUILDING_HALF_WIDTH: f32 = 10.0;
    pub const BUILDING_HALF_HEIGHT: f32 = 100.0;

    /// Default logical screen (iPhone 11 landscape points)
    pub const DEFAULT_SCREEN_WIDTH: f32 = 896.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 414.0;
}
