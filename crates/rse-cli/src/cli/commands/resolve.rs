//! `rse resolve <pfn>` – print the local path behind a PFN.

use anyhow::Result;
use rse_core::RseProtocol;

pub fn run_resolve(protocol: &dyn RseProtocol, pfn: &str) -> Result<()> {
    let path = protocol.pfn_to_local_path(pfn)?;
    println!("{}", path.display());
    Ok(())
}
