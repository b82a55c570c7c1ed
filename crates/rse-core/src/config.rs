use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::ChecksumAlgorithm;
use crate::pfn::{normalize_prefix, Lfn2PfnAlgorithm};

/// Retrieval variant: copy bytes on `get`, or link to the stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVariant {
    #[default]
    Copy,
    Symlink,
}

/// Storage element configuration loaded from `~/.config/rse/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RseConfig {
    /// URL scheme used when composing PFNs (e.g. "file").
    pub scheme: String,
    /// Hostname used when composing PFNs. "localhost" accepts PFNs without a host.
    pub hostname: String,
    /// Port checked against PFNs that carry one explicitly (0 = none).
    #[serde(default)]
    pub port: u16,
    /// Root path under which all files of this storage element live.
    pub prefix: String,
    /// Root created on demand when an upload finds it missing. Defaults to the
    /// normalized `prefix`, i.e. the directory PFNs actually resolve under.
    #[serde(default)]
    pub storage_root: Option<String>,
    /// Retrieval variant: "copy" (default) or "symlink".
    #[serde(default)]
    pub variant: ProtocolVariant,
    /// Deterministic path layout for LFNs without an explicit path.
    #[serde(default)]
    pub lfn2pfn_algorithm: Lfn2PfnAlgorithm,
    /// Digest reported by `stat`.
    #[serde(default)]
    pub checksum: ChecksumAlgorithm,
}

impl Default for RseConfig {
    fn default() -> Self {
        Self {
            scheme: "file".to_string(),
            hostname: "localhost".to_string(),
            port: 0,
            prefix: "/tmp/rse".to_string(),
            storage_root: None,
            variant: ProtocolVariant::Copy,
            lfn2pfn_algorithm: Lfn2PfnAlgorithm::Hash,
            checksum: ChecksumAlgorithm::Adler32,
        }
    }
}

/// Immutable per-instance protocol attributes, derived from [`RseConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RseAttributes {
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
    pub prefix: String,
    pub storage_root: PathBuf,
    pub lfn2pfn_algorithm: Lfn2PfnAlgorithm,
    pub checksum: ChecksumAlgorithm,
}

impl RseAttributes {
    /// Attributes with default layout and checksum; `storage_root` is the normalized `prefix`.
    pub fn new(scheme: &str, hostname: &str, prefix: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            hostname: hostname.to_string(),
            port: 0,
            prefix: prefix.to_string(),
            storage_root: PathBuf::from(normalize_prefix(prefix)),
            lfn2pfn_algorithm: Lfn2PfnAlgorithm::default(),
            checksum: ChecksumAlgorithm::default(),
        }
    }
}

impl RseConfig {
    pub fn attributes(&self) -> RseAttributes {
        RseAttributes {
            scheme: self.scheme.clone(),
            hostname: self.hostname.clone(),
            port: self.port,
            prefix: self.prefix.clone(),
            storage_root: match &self.storage_root {
                Some(root) => PathBuf::from(root),
                None => PathBuf::from(normalize_prefix(&self.prefix)),
            },
            lfn2pfn_algorithm: self.lfn2pfn_algorithm,
            checksum: self.checksum,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rse")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RseConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RseConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<RseConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: RseConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
