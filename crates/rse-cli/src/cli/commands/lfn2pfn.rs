//! `rse lfn2pfn <scope:name>...` – print the PFN of each identifier.

use anyhow::{bail, Context, Result};
use rse_core::{Lfn, RseProtocol};

/// Parse `scope:name` into an LFN. The name may itself contain `:`.
pub fn parse_did(did: &str) -> Result<Lfn> {
    let (scope, name) = did
        .split_once(':')
        .with_context(|| format!("expected scope:name, got '{did}'"))?;
    if scope.is_empty() || name.is_empty() {
        bail!("expected scope:name, got '{did}'");
    }
    Ok(Lfn::new(scope, name))
}

pub fn run_lfn2pfn(protocol: &dyn RseProtocol, dids: &[String], path: Option<String>) -> Result<()> {
    if path.is_some() && dids.len() != 1 {
        bail!("--path applies to a single scope:name");
    }
    let lfns = dids
        .iter()
        .map(|did| {
            let lfn = parse_did(did)?;
            Ok(match &path {
                Some(p) => lfn.with_path(p.clone()),
                None => lfn,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for (did, pfn) in protocol.lfns_to_pfns(&lfns) {
        println!("{did} {pfn}");
    }
    Ok(())
}
