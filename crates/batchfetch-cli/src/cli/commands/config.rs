//! `batchfetch config` – print where the config lives and what is in effect.

use anyhow::Result;
use batchfetch_core::config::{self, FetchConfig};
use std::path::Path;

pub fn run_show_config(explicit: Option<&Path>, cfg: &FetchConfig) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
