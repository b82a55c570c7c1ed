//! `rse exists <pfn>`.

use anyhow::Result;
use rse_core::RseProtocol;

pub fn run_exists(protocol: &dyn RseProtocol, pfn: &str) -> Result<()> {
    println!("{}", protocol.exists(pfn)?);
    Ok(())
}
