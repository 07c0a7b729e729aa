use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

use crate::core::{services::SummaryOptions, utils::PathResolver};
use crate::utils::persistence::{ensure_dir, write_atomic};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides `<base>/data` as the document directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub currency: String,
    pub upcoming_window_days: i64,
    pub high_expense_ratio: f64,
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency: "USD".into(),
            upcoming_window_days: 7,
            high_expense_ratio: 0.8,
            ui_color_enabled: true,
        }
    }
}

impl Config {
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            upcoming_window_days: self.upcoming_window_days,
            high_expense_ratio: self.high_expense_ratio,
            ..SummaryOptions::default()
        }
    }

    /// Document directory for a given application base.
    pub fn data_dir_in(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Stored configuration, or the defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
        assert!(manager.path().starts_with(dir.path()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            currency: "EUR".into(),
            upcoming_window_days: 14,
            ui_color_enabled: false,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert_eq!(config.summary_options().upcoming_window_days, 14);
    }

    #[test]
    fn partial_file_fills_in_defaults_and_ignores_unknown_keys() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency":"GBP","locale":"pt-PT"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.high_expense_ratio, 0.8);
        assert_eq!(
            config.data_dir_in(dir.path()),
            PathResolver::data_dir_in(dir.path())
        );
    }
}
