//! `rse put <source> <target>` – store a local file at a PFN.

use anyhow::Result;
use rse_core::RseProtocol;
use std::path::Path;

pub fn run_put(
    protocol: &dyn RseProtocol,
    source: &Path,
    target: &str,
    source_dir: Option<&Path>,
) -> Result<()> {
    protocol.put(source, target, source_dir, None)?;
    tracing::info!(src = %source.display(), pfn = target, "stored file");
    Ok(())
}
