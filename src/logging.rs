// File: src/logging.rs
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use std::fs;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Send `log` records to `medx.log` in the data directory.
///
/// The terminal belongs to the UI, so nothing is written to stderr.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(level: &str) -> Result<()> {
    let path = AppPaths::get_log_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    log::info!("Logging to {:?}", path);
    Ok(())
}
