//! Configuration
//!
//! Optional `config.yaml` in the platform config directory. Every key has
//! a default, so a missing file is the same as an empty one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_ICON: &str = "$(git-compare)";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period after the last trigger before a pass runs
    pub debounce_ms: u64,
    /// Token placed in front of the status text
    pub icon: String,
    /// Whether the details panel starts visible
    pub show_details: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            icon: DEFAULT_ICON.to_string(),
            show_details: true,
        }
    }
}

impl Config {
    /// `<config dir>/linestat/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "linestat").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load from an explicit path (must exist) or the default location
    ///
    /// A missing or malformed default file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            return Self::parse(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()));
        }

        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(&path) {
            Ok(text) => Ok(Self::parse(&text).unwrap_or_else(|e| {
                tracing::warn!(event = "config.parse_failed", path = %path.display(), error = %e);
                Self::default()
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                tracing::warn!(event = "config.read_failed", path = %path.display(), error = %e);
                Ok(Self::default())
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.icon, "$(git-compare)");
        assert!(config.show_details);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::parse("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse("debounce_ms: 250\nicon: \"Δ\"\n").unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.icon, "Δ");
        assert!(config.show_details);
    }

    #[test]
    fn test_malformed() {
        assert!(Config::parse("debounce_ms: soon").is_err());
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "show_details: false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.show_details);

        assert!(Config::load(Some(&dir.path().join("missing.yaml"))).is_err());
    }
}
