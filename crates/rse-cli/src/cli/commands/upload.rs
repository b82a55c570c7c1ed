//! `rse upload <scope> <files>... [--jobs N]` – concurrent uploads through one shared protocol.
//!
//! Keeps up to `jobs` blocking puts in flight; when one finishes, the next
//! file is started until all are stored. The first failure aborts the run.

use anyhow::{anyhow, Result};
use rse_core::{Lfn, RseProtocol};
use std::path::PathBuf;
use std::sync::Arc;

/// Uploads `files` as `scope:<file name>` and prints `scope:name pfn` per stored file.
/// Returns the number of files stored.
pub async fn run_upload(
    protocol: Arc<dyn RseProtocol>,
    scope: &str,
    files: Vec<PathBuf>,
    jobs: usize,
) -> Result<u32> {
    let max_concurrent = jobs.max(1);
    let mut pending = files.into_iter();
    let mut join_set = tokio::task::JoinSet::new();
    let mut uploaded = 0u32;

    loop {
        while join_set.len() < max_concurrent {
            let Some(file) = pending.next() else {
                break;
            };
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("not a file name: {}", file.display()))?;
            let lfn = Lfn::new(scope, name);
            let did = lfn.did();
            let pfn = protocol
                .lfns_to_pfns(std::slice::from_ref(&lfn))
                .remove(&did)
                .ok_or_else(|| anyhow!("no PFN for {did}"))?;

            let protocol = Arc::clone(&protocol);
            join_set.spawn_blocking(move || {
                protocol.put(&file, &pfn, None, None)?;
                Ok::<_, rse_core::ProtocolError>((did, pfn))
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let (did, pfn) = res.map_err(|e| anyhow!("upload task join: {}", e))??;
        println!("{did} {pfn}");
        uploaded += 1;
    }

    tracing::info!(uploaded, scope, "upload finished");
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rse_core::config::RseConfig;
    use rse_core::{build_protocol, FaultKind, ProtocolError};

    fn protocol_in(dir: &tempfile::TempDir) -> Arc<dyn RseProtocol> {
        let cfg = RseConfig {
            prefix: dir.path().join("rse").to_string_lossy().into_owned(),
            ..RseConfig::default()
        };
        Arc::from(build_protocol(&cfg))
    }

    #[tokio::test]
    async fn uploads_every_file_with_bounded_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let protocol = protocol_in(&dir);
        let files: Vec<PathBuf> = (0..5)
            .map(|i| {
                let p = dir.path().join(format!("f{i}.dat"));
                std::fs::write(&p, format!("body {i}")).unwrap();
                p
            })
            .collect();

        let n = run_upload(Arc::clone(&protocol), "test", files, 2)
            .await
            .unwrap();
        assert_eq!(n, 5);
        for i in 0..5 {
            let lfn = Lfn::new("test", format!("f{i}.dat"));
            let pfn = protocol.lfns_to_pfns(std::slice::from_ref(&lfn))[&lfn.did()].clone();
            assert!(protocol.exists(&pfn).unwrap());
        }
    }

    #[tokio::test]
    async fn missing_file_fails_with_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let protocol = protocol_in(&dir);
        let err = run_upload(protocol, "test", vec![dir.path().join("absent.dat")], 1)
            .await
            .unwrap_err();
        let fault = err.downcast_ref::<ProtocolError>().expect("protocol fault");
        assert_eq!(fault.kind(), FaultKind::SourceNotFound);
    }
}
