use std::time::Duration;

use grid_chase_core::{LevelConfig, SetupError, DEFAULT_GRID_SIZE, DEFAULT_REFRESH_RATE};

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0x6772_6964_6368_6173;

/// Parameters that fix a session before it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Edge length of the square grid.
    pub grid_size: u32,
    /// Interval between two clock ticks.
    pub refresh_rate: Duration,
    /// Seed for the level generator and adversary movement.
    pub seed: u64,
    /// Entity counts handed to the level generator.
    pub level: LevelConfig,
}

impl SessionConfig {
    /// Rejects sizes and intervals that are not positive.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.grid_size == 0 {
            return Err(SetupError::InvalidConfiguration(
                "grid size must be greater than zero",
            ));
        }
        if self.refresh_rate.is_zero() {
            return Err(SetupError::InvalidConfiguration(
                "refresh rate must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            refresh_rate: DEFAULT_REFRESH_RATE,
            seed: DEFAULT_SEED,
            level: LevelConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.refresh_rate, Duration::from_millis(200));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_values_are_rejected() {
        let zero_size = SessionConfig {
            grid_size: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            zero_size.validate(),
            Err(SetupError::InvalidConfiguration(_))
        ));

        let zero_rate = SessionConfig {
            refresh_rate: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(matches!(
            zero_rate.validate(),
            Err(SetupError::InvalidConfiguration(_))
        ));
    }
}
