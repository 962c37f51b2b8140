//! Difficulty ramp
//!
//! The obstacle speeds up by shortening the difficulty tick period as the
//! score crosses fixed thresholds.

use std::time::Duration;

use crate::consts::BASE_DIFFICULTY_INTERVAL;

/// Score thresholds and their difficulty tick periods, in evaluation order
pub const LEVELS: [(f64, Duration); 3] = [
    (20.0, Duration::from_millis(80)),
    (40.0, Duration::from_millis(60)),
    (60.0, Duration::from_millis(40)),
];

/// Period the difficulty source should be reconfigured to, if any.
///
/// Each band is checked on its own, in ascending order, and the last match
/// wins. Below the first threshold nothing is reconfigured.
pub fn reconfiguration(score: f64) -> Option<Duration> {
    let mut interval = None;
    for (i, &(threshold, period)) in LEVELS.iter().enumerate() {
        let upper = LEVELS.get(i + 1).map_or(f64::INFINITY, |&(next, _)| next);
        if score >= threshold && score < upper {
            interval = Some(period);
        }
    }
    interval
}

/// Difficulty tick period for a score
pub fn tick_interval(score: f64) -> Duration {
    reconfiguration(score).unwrap_or(BASE_DIFFICULTY_INTERVAL)
}

/// Difficulty level index (0 = base) for display and logging
pub fn level(score: f64) -> usize {
    LEVELS.iter().filter(|&&(threshold, _)| score >= threshold).count()
}
