//! Configuration system
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation and type safety

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const APP_NAME: &str = "release-dashboard";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Where the release export is read from
    pub source: SourceConfig,

    /// Table and dashboard presentation
    pub display: DisplayConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Paths configuration
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// File path or http(s) URL of the CSV export
    pub location: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub json_pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub log_directory: PathBuf,
    pub preferences_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "ERROR".to_string(),
                format: "pretty".to_string(),
                output: "console".to_string(),
            },
            source: SourceConfig {
                location: "data/releases.csv".to_string(),
                timeout_secs: 30,
            },
            display: DisplayConfig { page_size: 10 },
            output: OutputConfig { json_pretty: true },
            paths: PathsConfig {
                log_directory: PathBuf::from("logs"),
                preferences_file: dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_NAME)
                    .join("preferences.toml"),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment, file, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from(format!("{APP_NAME}.toml")),
            PathBuf::from(format!(".{APP_NAME}.toml")),
            dirs::config_dir()
                .map(|d| d.join(APP_NAME).join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DashboardError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        if let Ok(val) = env::var("RELEASE_DASHBOARD_SOURCE") {
            self.source.location = val;
        }
        if let Ok(val) = env::var("RELEASE_DASHBOARD_TIMEOUT_SECS") {
            self.source.timeout_secs = parse_env("RELEASE_DASHBOARD_TIMEOUT_SECS", &val)?;
        }

        if let Ok(val) = env::var("RELEASE_DASHBOARD_PAGE_SIZE") {
            self.display.page_size = parse_env("RELEASE_DASHBOARD_PAGE_SIZE", &val)?;
        }
        if let Ok(val) = env::var("RELEASE_DASHBOARD_JSON_PRETTY") {
            self.output.json_pretty = parse_env("RELEASE_DASHBOARD_JSON_PRETTY", &val)?;
        }

        if let Ok(val) = env::var("RELEASE_DASHBOARD_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }
        if let Ok(val) = env::var("RELEASE_DASHBOARD_PREFERENCES") {
            self.paths.preferences_file = PathBuf::from(val);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 || self.display.page_size > 500 {
            return Err(DashboardError::config(format!(
                "Page size must be between 1 and 500, got {}",
                self.display.page_size
            )));
        }

        if self.source.timeout_secs == 0 {
            return Err(DashboardError::config("Source timeout must be greater than 0"));
        }

        if self.source.location.trim().is_empty() {
            return Err(DashboardError::config("Source location cannot be empty"));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(DashboardError::config(format!(
                "Unknown log format '{}', expected 'pretty' or 'json'",
                self.logging.format
            )));
        }

        match self.logging.output.as_str() {
            "console" => {}
            "file" | "both" => {
                if !self.paths.log_directory.exists() {
                    fs::create_dir_all(&self.paths.log_directory)?;
                }
            }
            other => {
                return Err(DashboardError::config(format!(
                    "Unknown log output '{}', expected 'console', 'file' or 'both'",
                    other
                )));
            }
        }

        if self.display.page_size > 100 {
            warn!(
                page_size = self.display.page_size,
                "Large page size, the dashboard table may not fit the terminal"
            );
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DashboardError::config(format!("Failed to serialize configuration: {}", e)))?;

        fs::write(path, content)?;
        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DashboardError::config(format!("Invalid {}: '{}'", name, value)))
}
