use log::info;

use crate::constants::MIN_SPAWN_PROBABILITY;

/// Step function from cumulative score to spawn probability.
///
/// Every threshold the score reaches lowers the probability denominator by
/// one, exactly once per threshold, never below [`MIN_SPAWN_PROBABILITY`].
pub struct DifficultyController {
    starting: u32,
    thresholds: Vec<u32>,
    tier: usize,
    spawn_probability: u32,
}

impl DifficultyController {
    pub fn new(starting: u32, thresholds: Vec<u32>) -> Self {
        DifficultyController {
            starting,
            thresholds,
            tier: 0,
            spawn_probability: starting.max(MIN_SPAWN_PROBABILITY),
        }
    }

    pub fn spawn_probability(&self) -> u32 {
        self.spawn_probability
    }

    pub fn tier(&self) -> usize {
        self.tier
    }

    /// Difficulty level shown to the player, starting at 1.
    pub fn level(&self) -> u32 {
        self.starting.saturating_sub(self.spawn_probability) + 1
    }

    /// Feeds the latest cumulative score. Returns how many thresholds were
    /// crossed by this update.
    pub fn observe(&mut self, score: u32) -> usize {
        let mut crossed = 0;
        while let Some(&threshold) = self.thresholds.get(self.tier) {
            if score < threshold {
                break;
            }
            self.tier += 1;
            crossed += 1;
            self.spawn_probability = self
                .spawn_probability
                .saturating_sub(1)
                .max(MIN_SPAWN_PROBABILITY);
            info!(
                "Score {} crossed threshold {}: spawn probability now 1/{}",
                score, threshold, self.spawn_probability
            );
        }
        crossed
    }
}
