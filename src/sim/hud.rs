//! Read-only snapshot handed to the presentation layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    /// Current score, truncated
    pub score: u32,
    /// Best score, truncated
    pub high_score: u32,
    pub drone: Vec2,
    /// Drone sprite size
    pub drone_size: Vec2,
    pub building: Vec2,
    /// Building sprite size
    pub building_size: Vec2,
    /// Logical screen size
    pub screen: Vec2,
    pub phase: SessionPhase,
    /// Title screen start button
    pub show_start_button: bool,
    /// Restart button after a loss
    pub show_restart_button: bool,
}

impl HudView {
    pub fn score_label(&self) -> String {
        self.score.to_string()
    }

    pub fn high_score_label(&self) -> String {
        format!("High Score: {}", self.high_score)
    }
}
