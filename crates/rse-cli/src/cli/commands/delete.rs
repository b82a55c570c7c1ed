//! `rse delete <pfn>`.

use anyhow::Result;
use rse_core::RseProtocol;

pub fn run_delete(protocol: &dyn RseProtocol, pfn: &str) -> Result<()> {
    protocol.delete(pfn)?;
    println!("Deleted {pfn}");
    Ok(())
}
