//! `rse rename <pfn> <new_pfn>`.

use anyhow::Result;
use rse_core::RseProtocol;

pub fn run_rename(protocol: &dyn RseProtocol, pfn: &str, new_pfn: &str) -> Result<()> {
    protocol.rename(pfn, new_pfn)?;
    println!("Renamed {pfn} -> {new_pfn}");
    Ok(())
}
