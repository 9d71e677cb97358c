use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use grid_chase_core::LevelConfig;
use grid_chase_session::SessionConfig;
use serde::Deserialize;

/// Settings read from a TOML file. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) grid_size: Option<u32>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) seed: Option<u64>,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) level: Option<LevelConfig>,
}

impl ConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Layers the file's values over `base`.
    pub(crate) fn apply(&self, base: SessionConfig) -> SessionConfig {
        SessionConfig {
            grid_size: self.grid_size.unwrap_or(base.grid_size),
            refresh_rate: self
                .tick_ms
                .map_or(base.refresh_rate, Duration::from_millis),
            seed: self.seed.unwrap_or(base.seed),
            level: self.level.unwrap_or(base.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let file = ConfigFile::parse("").expect("empty toml is valid");
        assert_eq!(file, ConfigFile::default());
        assert_eq!(file.apply(SessionConfig::default()), SessionConfig::default());
    }

    #[test]
    fn values_override_the_base() {
        let file = ConfigFile::parse(
            r#"
            grid_size = 14
            tick_ms = 50
            seed = 99
            max_ticks = 300

            [level]
            adversaries = 6
            "#,
        )
        .expect("valid toml");

        let config = file.apply(SessionConfig::default());
        assert_eq!(config.grid_size, 14);
        assert_eq!(config.refresh_rate, Duration::from_millis(50));
        assert_eq!(config.seed, 99);
        assert_eq!(config.level.adversaries, 6);
        assert_eq!(config.level.energizers, LevelConfig::default().energizers);
        assert_eq!(file.max_ticks, Some(300));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigFile::parse("speed = 3").is_err());
    }
}
