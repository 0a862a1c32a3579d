//! Listening levels
//!
//! A level is the highest threshold of the table at or below the total
//! listening time. The stored level only ever moves up.

use serde::{Deserialize, Serialize};

/// Ascending `(seconds, name)` thresholds
pub const LEVELS: [(u64, &str); 6] = [
    (0, "Newcomer"),
    (600, "Listener"),
    (3_600, "Enthusiast"),
    (18_000, "Devotee"),
    (36_000, "Audiophile"),
    (86_400, "Legend"),
];

/// Tier index for a total, in `LEVELS`
pub fn tier_for(total_seconds: f64) -> usize {
    LEVELS
        .iter()
        .rposition(|&(threshold, _)| total_seconds >= threshold as f64)
        .unwrap_or(0)
}

/// Level name for a total
pub fn level_for(total_seconds: f64) -> &'static str {
    LEVELS[tier_for(total_seconds)].1
}

fn tier_of_name(name: &str) -> Option<usize> {
    LEVELS.iter().position(|&(_, n)| n == name)
}

/// Highest level reached, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLevel {
    level: String,
}

impl Default for UserLevel {
    fn default() -> Self {
        Self {
            level: LEVELS[0].1.to_string(),
        }
    }
}

impl UserLevel {
    /// Stored level name
    pub fn name(&self) -> &str {
        &self.level
    }

    fn tier(&self) -> usize {
        tier_of_name(&self.level).unwrap_or(0)
    }

    /// Raise the stored level to match `total_seconds`
    ///
    /// Returns every tier name crossed, lowest first; empty when the level
    /// did not change. Never lowers the level.
    pub fn advance(&mut self, total_seconds: f64) -> Vec<&'static str> {
        let stored = self.tier();
        let derived = tier_for(total_seconds);
        if derived <= stored {
            return Vec::new();
        }

        self.level = LEVELS[derived].1.to_string();
        LEVELS[stored + 1..=derived]
            .iter()
            .map(|&(_, name)| name)
            .collect()
    }

    /// Bring the stored level in line with a loaded total without reporting
    ///
    /// Used at startup, so a restored ledger does not replay old level-ups.
    pub fn reconcile(&mut self, total_seconds: f64) {
        let tier = self.tier().max(tier_for(total_seconds));
        self.level = LEVELS[tier].1.to_string();
    }
}
