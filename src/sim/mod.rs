//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform code:
//! - Time arrives as ticks from an injected scheduler
//! - Obstacle placement uses a seeded RNG
//! - Persistence goes through the `ScoreStore` trait

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod hud;
pub mod session;
pub mod state;
pub mod tick;

pub use clock::GameClock;
pub use collision::collides;
pub use hud::HudView;
pub use session::{GameSession, SessionEvent};
pub use state::{Building, Drone, EntityState, SessionPhase};
pub use tick::{Bounds, ObstacleOutcome, PhysicsOutcome, bounds, obstacle_step, physics_step};
