//! Throwaway storage elements rooted in a temp directory.

use rse_core::config::{ProtocolVariant, RseConfig};
use rse_core::{build_protocol, RseProtocol};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestRse {
    pub dir: TempDir,
    pub config: RseConfig,
    pub protocol: Box<dyn RseProtocol>,
}

impl TestRse {
    /// Storage element whose prefix `<tmp>/root/rse` does not exist yet.
    pub fn new(variant: ProtocolVariant) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let config = RseConfig {
            prefix: root.join("rse").to_string_lossy().into_owned(),
            storage_root: Some(root.to_string_lossy().into_owned()),
            variant,
            ..RseConfig::default()
        };
        let protocol = build_protocol(&config);
        Self {
            dir,
            config,
            protocol,
        }
    }

    pub fn storage_root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    /// Write `body` to a fresh file outside the storage element.
    pub fn local_file(&self, name: &str, body: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }
}
