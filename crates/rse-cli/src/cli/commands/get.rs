//! `rse get <pfn> <dest>` – copy (or link) a stored file to a local path.

use anyhow::Result;
use rse_core::RseProtocol;
use std::path::Path;

pub fn run_get(protocol: &dyn RseProtocol, pfn: &str, dest: &Path) -> Result<()> {
    protocol.get(pfn, dest, None)?;
    tracing::info!(pfn, dest = %dest.display(), "retrieved file");
    Ok(())
}
