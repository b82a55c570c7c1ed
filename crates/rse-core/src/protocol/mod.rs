//! Storage protocol capability set and its local-filesystem implementations.
//!
//! [`PosixProtocol`] copies bytes on `get`; [`SymlinkProtocol`] links to the
//! stored file instead and shares everything else. The variant is chosen once,
//! from configuration, by [`build_protocol`].

pub mod classify;
mod error;
mod posix;
mod symlink;

pub use error::{FaultKind, ProtocolError};
pub use posix::PosixProtocol;
pub use symlink::SymlinkProtocol;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{ProtocolVariant, RseConfig};
use crate::pfn::Lfn;

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Size and digest of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub filesize: u64,
    pub checksum: String,
}

/// Operations every storage protocol variant provides.
///
/// Implementations hold only immutable attributes and are safe to share
/// between workers. `timeout` is accepted for interface compatibility with
/// remote backends and ignored by local ones.
pub trait RseProtocol: Send + Sync {
    /// Establish a session with the storage element. Fails with `RseAccessDenied`.
    fn connect(&self) -> ProtocolResult<()>;

    fn close(&self) -> ProtocolResult<()>;

    /// Whether the file exists. Failures other than "missing" are `ServiceUnavailable`.
    fn exists(&self, pfn: &str) -> ProtocolResult<bool>;

    /// Retrieve the file behind `pfn` to the local `destination`.
    ///
    /// A file already at `destination` is replaced. On failure it may be gone
    /// as well: backends check writability by creating and removing it.
    fn get(&self, pfn: &str, destination: &Path, timeout: Option<Duration>) -> ProtocolResult<()>;

    /// Store `source` (under `source_dir` when given) at `target`.
    fn put(
        &self,
        source: &Path,
        target: &str,
        source_dir: Option<&Path>,
        timeout: Option<Duration>,
    ) -> ProtocolResult<()>;

    fn delete(&self, pfn: &str) -> ProtocolResult<()>;

    fn rename(&self, pfn: &str, new_pfn: &str) -> ProtocolResult<()>;

    fn stat(&self, pfn: &str) -> ProtocolResult<FileStat>;

    /// PFNs keyed by `scope:name`.
    fn lfns_to_pfns(&self, lfns: &[Lfn]) -> BTreeMap<String, String>;

    fn pfn_to_local_path(&self, pfn: &str) -> ProtocolResult<PathBuf>;
}

/// Build the variant selected by `cfg.variant`.
pub fn build_protocol(cfg: &RseConfig) -> Box<dyn RseProtocol> {
    let attributes = cfg.attributes();
    match cfg.variant {
        ProtocolVariant::Copy => Box::new(PosixProtocol::new(attributes)),
        ProtocolVariant::Symlink => Box::new(SymlinkProtocol::new(attributes)),
    }
}
