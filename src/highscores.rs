//! Best score tracking
//!
//! Loaded from a [`ScoreStore`] once per session and written back only when
//! a finished run beats it.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// The best score reached across all sessions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: f64,
}

impl HighScore {
    pub fn new(best: f64) -> Self {
        Self {
            best: best.max(0.0),
        }
    }

    /// Load from a store (0 when nothing is stored)
    pub fn load(store: &impl ScoreStore) -> Self {
        let best = store.read_high_score();
        log::info!("Loaded high score {:.1}", best);
        Self::new(best)
    }

    pub fn value(&self) -> f64 {
        self.best
    }

    /// Integer value shown to the player
    pub fn display(&self) -> u32 {
        self.best as u32
    }

    /// Check if a finished run beats the current best
    pub fn qualifies(&self, score: f64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn submit(&mut self, score: f64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Record a finished run and persist it when it is a new best
    pub fn submit_and_save(&mut self, score: f64, store: &mut impl ScoreStore) -> bool {
        if !self.submit(score) {
            return false;
        }
        store.write_high_score(self.best);
        true
    }

    /// Replace the in-memory value with whatever the store holds now
    pub fn resync(&mut self, store: &impl ScoreStore) {
        self.best = store.read_high_score().max(0.0);
    }
}
