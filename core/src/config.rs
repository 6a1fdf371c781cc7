//! Configuration loaded from `config.toml` in the data directory.
//!
//! A missing file means defaults. Missing sections or keys also fall back
//! to defaults, so older config files keep working as fields are added.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::BunkrError;
use crate::model::bunk::TargetPercent;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Thresholds used for the UI hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Comfortable attendance level
    pub safe: TargetPercent,
    /// Hard floor, e.g. exam eligibility
    pub minimum: TargetPercent,
    /// Target for subjects without their own
    pub default_target: TargetPercent,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            safe: TargetPercent::SAFE,
            minimum: TargetPercent::MINIMUM,
            default_target: TargetPercent::SAFE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| BunkrError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether [`load`](Self::load) reads a file rather than using defaults.
    pub fn exists_in(data_dir: &Path) -> bool {
        Self::path_in(data_dir).is_file()
    }

    /// Loads `<data_dir>/config.toml`, or defaults when the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path_in(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| BunkrError::Config(e.to_string()))?;
        fs::write(Self::path_in(data_dir), content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.minimum > t.safe {
            return Err(BunkrError::Config(format!(
                "thresholds.minimum ({}) is above thresholds.safe ({})",
                t.minimum, t.safe
            ))
            .into());
        }

        let level = self.logging.level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(BunkrError::Config(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ))
            .into());
        }
        Ok(())
    }
}
