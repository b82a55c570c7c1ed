//! `rse stat <pfn>` – size and checksum as JSON.

use anyhow::Result;
use rse_core::RseProtocol;

pub fn run_stat(protocol: &dyn RseProtocol, pfn: &str) -> Result<()> {
    let stat = protocol.stat(pfn)?;
    println!("{}", serde_json::to_string(&stat)?);
    Ok(())
}
