//! Collision detection between the drone and the building
//!
//! A tuned box-overlap test on center distances. The half-extents are
//! gameplay constants and intentionally differ from the sprite sizes.

use glam::Vec2;

use crate::consts::{BUILDING_HALF_HEIGHT, BUILDING_HALF_WIDTH, DRONE_HALF_EXTENT};

/// Maximum |dx| between centers that still counts as overlap
pub const COLLISION_REACH_X: f32 = DRONE_HALF_EXTENT + BUILDING_HALF_WIDTH;
/// Maximum |dy| between centers that still counts as overlap
pub const COLLISION_REACH_Y: f32 = DRONE_HALF_EXTENT + BUILDING_HALF_HEIGHT;

/// Check whether the drone at `drone` overlaps the building at `building`
#[inline]
pub fn collides(drone: Vec2, building: Vec2) -> bool {
    let delta = (drone - building).abs();
    delta.x < COLLISION_REACH_X && delta.y < COLLISION_REACH_Y
}
