//! Checksum command: digest of a local file with the configured algorithm.

use anyhow::{Context, Result};
use rse_core::config::RseConfig;
use std::path::Path;

pub fn run_checksum(cfg: &RseConfig, path: &Path) -> Result<()> {
    let digest = cfg
        .checksum
        .digest_path(path)
        .with_context(|| format!("checksum {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
