// File: src/paths.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Overrides every directory lookup (tests, portable installs).
pub const DATA_DIR_ENV: &str = "MEDX_DATA_DIR";

pub struct AppPaths;

impl AppPaths {
    fn get_proj_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "medx", "medx")
    }

    /// Helper to ensure a directory exists before returning it.
    fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
        if !path.exists() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(path)
    }

    fn resolve_base(subdir: &str) -> Option<PathBuf> {
        if let Ok(dir) = env::var(DATA_DIR_ENV)
            && !dir.is_empty()
        {
            return Some(PathBuf::from(dir));
        }

        let proj = Self::get_proj_dirs()?;
        let dir = match subdir {
            "data" => proj.data_dir(),
            "config" => proj.config_dir(),
            _ => return None,
        };
        Some(dir.to_path_buf())
    }

    pub fn get_data_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("data")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let path = Self::resolve_base("config")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::ensure_exists(path)
    }

    pub fn get_config_file_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn get_medicines_path() -> Result<PathBuf> {
        Ok(Self::get_data_dir()?.join("medicines.json"))
    }

    pub fn get_schedules_path() -> Result<PathBuf> {
        Ok(Self::get_data_dir()?.join("schedules.json"))
    }

    pub fn get_log_path() -> Result<PathBuf> {
        Ok(Self::get_data_dir()?.join("medx.log"))
    }
}
