use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatcher::{DispatchSettings, DEFAULT_WORKERS};
use crate::pool;

/// Global configuration loaded from `~/.config/batchfetch/config.toml`.
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Newline-delimited URL list.
    pub input: PathBuf,
    /// Directory receiving `{index}.html` files. Must already exist.
    pub output_dir: PathBuf,
    /// Number of worker threads. Independent of the host CPU count; capped at
    /// [`pool::MAX_POOL_SIZE`].
    pub workers: usize,
    /// Per-request timeout in seconds (connect + headers + body).
    pub timeout_secs: u64,
    /// Log file; if missing, `~/.local/state/batchfetch/batchfetch.log`.
    pub log_file: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("urls.txt"),
            output_dir: PathBuf::from("out"),
            workers: DEFAULT_WORKERS,
            timeout_secs: 60,
            log_file: None,
        }
    }
}

impl FetchConfig {
    /// Timeout as a duration; zero is bumped to one second so it never means "no limit".
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            workers: pool::clamp_size(self.workers),
            timeout: self.timeout(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("batchfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// The flag is true when the file was just created, so the caller can say so
/// once logging is up.
pub fn load_or_init() -> Result<(FetchConfig, bool)> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<(FetchConfig, bool)> {
    if path.exists() {
        return Ok((load_from_path(path)?, false));
    }
    let default_cfg = FetchConfig::default();
    let toml = toml::to_string_pretty(&default_cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    Ok((default_cfg, true))
}

/// Load an explicit config file. Unlike [`load_or_init`], a missing file is an error.
pub fn load_from_path(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FetchConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
