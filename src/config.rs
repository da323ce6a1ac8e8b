use crate::constants::*;
use crate::error::ConfigError;

// Room for walls, one ship column and the spawn column.
const MIN_FIELD_WIDTH: u16 = 5;
const MIN_FIELD_HEIGHT: u16 = 3;

/// Runtime configuration for a round. Defaults mirror `constants`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub max_shots: usize,
    pub fire_speed_ms: u64,
    pub recharge_rate_ms: u64,
    pub spawn_shift_delay_ms: u64,
    pub spawn_shift_period_ms: u64,
    pub score_tick_delay_ms: u64,
    pub score_tick_period_ms: u64,
    pub color_reset_delay_ms: u64,
    pub starting_difficulty: u32,
    pub thresholds: Vec<u32>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            max_shots: MAX_SHOTS,
            fire_speed_ms: FIRE_SPEED_MS,
            recharge_rate_ms: RECHARGE_RATE_MS,
            spawn_shift_delay_ms: SPAWN_SHIFT_DELAY_MS,
            spawn_shift_period_ms: SPAWN_SHIFT_PERIOD_MS,
            score_tick_delay_ms: SCORE_TICK_DELAY_MS,
            score_tick_period_ms: SCORE_TICK_PERIOD_MS,
            color_reset_delay_ms: COLOR_RESET_DELAY_MS,
            starting_difficulty: STARTING_DIFFICULTY,
            thresholds: DIFFICULTY_THRESHOLDS.to_vec(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_FIELD_WIDTH || self.height < MIN_FIELD_HEIGHT {
            return Err(ConfigError::FieldTooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_FIELD_WIDTH,
                min_height: MIN_FIELD_HEIGHT,
            });
        }
        let periods = [
            ("max_shots", self.max_shots as u64),
            ("fire_speed_ms", self.fire_speed_ms),
            ("recharge_rate_ms", self.recharge_rate_ms),
            ("spawn_shift_period_ms", self.spawn_shift_period_ms),
            ("score_tick_period_ms", self.score_tick_period_ms),
            ("starting_difficulty", self.starting_difficulty as u64),
        ];
        if let Some(&(name, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroValue(name));
        }
        if self.thresholds.is_empty() || self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::BadThresholds);
        }
        Ok(())
    }

    /// Row index of the bottom wall.
    pub fn bottom_wall(&self) -> u16 {
        self.height - 1
    }

    /// Column new obstacles are spawned into.
    pub fn trailing_column(&self) -> u16 {
        self.width - 2
    }

    /// Right-most column the ship may occupy.
    pub fn ship_max_x(&self) -> u16 {
        self.width - 3
    }

    /// Status lines sit below the playfield, leaving one blank row under the wall.
    pub fn hud_row(&self, offset: u16) -> u16 {
        self.height + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.trailing_column(), 58);
        assert_eq!(config.ship_max_x(), 57);
        assert_eq!(config.hud_row(1), 19);
    }

    #[test]
    fn rejects_tiny_field() {
        let config = GameConfig {
            width: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FieldTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_zero_periods_and_bad_tables() {
        let config = GameConfig {
            recharge_rate_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroValue("recharge_rate_ms"))
        );

        let config = GameConfig {
            thresholds: vec![10, 10],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadThresholds));

        let config = GameConfig {
            thresholds: Vec::new(),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadThresholds));
    }
}
