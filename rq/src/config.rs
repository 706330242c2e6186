//! Render queue configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::EffectDurations;
use crate::scheduler::SchedulerConfig;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); `--log-level` wins
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Queue behaviour
    pub scheduler: SchedulerConfig,

    /// Simulated render time per effect, in milliseconds
    pub effects: EffectDurations,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate().context("Invalid scheduler configuration")?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .renderqueue.yml
        let local_config = PathBuf::from(".renderqueue.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/renderqueue/renderqueue.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("renderqueue").join("renderqueue.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Effect;
    use crate::scheduler::PriorityOrdering;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.log_level.is_none());
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.effects.get_ms(Effect::ColorGrade), Some(2000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log-level: debug\nscheduler:\n  max-queue-depth: 8\n  priority-ordering: high-first\neffects:\n  blur: 20\n  trim: 5\n"
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.scheduler.max_queue_depth, Some(8));
        assert_eq!(config.scheduler.priority_ordering, PriorityOrdering::HighFirst);
        assert_eq!(config.effects.get_ms(Effect::Blur), Some(20));
        // A partial effects table replaces the defaults entirely
        assert_eq!(config.effects.get_ms(Effect::ColorGrade), None);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scheduler: [not, a, map]").unwrap();
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config: Config = serde_yaml::from_str("scheduler:\n  max-queue-depth: 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
