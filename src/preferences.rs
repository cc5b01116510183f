//! Persisted theme preference
//!
//! The only state that outlives a run: a `theme = "light" | "dark"` entry in
//! a small TOML file. It is read once at startup and rewritten on every
//! change.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(DashboardError::preferences(format!("Unknown theme '{}'", other))),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    theme: Option<Theme>,
}

/// Reads and writes the theme preference file
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme, `Ok(None)` when nothing has been saved yet
    pub fn read(&self) -> Result<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let file: PreferencesFile = toml::from_str(&content).map_err(|e| {
            DashboardError::preferences(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(file.theme)
    }

    /// Startup theme: stored value, then the terminal's hint, then light
    pub fn load(&self) -> Theme {
        match self.read() {
            Ok(Some(theme)) => {
                debug!(%theme, "Using stored theme");
                return theme;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable theme preference"),
        }
        detect_system_theme().unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string(&PreferencesFile { theme: Some(theme) }).map_err(|e| {
            DashboardError::preferences(format!("Failed to serialize theme: {}", e))
        })?;
        fs::write(&self.path, content)?;
        info!(%theme, path = %self.path.display(), "Saved theme preference");
        Ok(())
    }
}

/// Dark/light hint from the terminal environment (`COLORFGBG`)
pub fn detect_system_theme() -> Option<Theme> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;extra;bg`); ANSI backgrounds 0-6 and 8 are dark
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match background {
        0..=6 | 8 => Theme::Dark,
        _ => Theme::Light,
    })
}
