// File: src/config.rs
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_millis() -> u64 {
    1000
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Countdown refresh period while the detail view is open.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,

    /// Move a stale dose time forward to its next daily occurrence when the
    /// detail view opens. Off by default: the countdown then runs against the
    /// stored instant exactly.
    #[serde(default)]
    pub roll_forward_on_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tick_millis: default_tick_millis(),
            roll_forward_on_open: false,
        }
    }
}

impl Config {
    /// Load from the standard location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::get_config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("Invalid config at {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::get_config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = AppPaths::get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_millis.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.tick_interval(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.tick_millis, 1000);
        assert!(!cfg.roll_forward_on_open);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config {
            log_level: "warn".to_string(),
            tick_millis: 500,
            roll_forward_on_open: true,
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_millis = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
