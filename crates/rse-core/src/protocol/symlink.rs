//! Local filesystem access where `get` links to the stored file instead of copying it.
//!
//! Meant for storage that is already mounted on the client: downloads become
//! symlinks, every other operation acts on the real file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::classify::{classify, Side};
use super::posix::{PathResolution, PosixProtocol};
use super::{FileStat, ProtocolError, ProtocolResult, RseProtocol};
use crate::config::RseAttributes;
use crate::pfn::Lfn;

#[derive(Debug, Clone)]
pub struct SymlinkProtocol {
    inner: PosixProtocol,
}

impl SymlinkProtocol {
    pub fn new(attributes: RseAttributes) -> Self {
        Self {
            inner: PosixProtocol::with_resolution(attributes, PathResolution::Normalized),
        }
    }
}

#[cfg(unix)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

impl RseProtocol for SymlinkProtocol {
    fn connect(&self) -> ProtocolResult<()> {
        self.inner.connect()
    }

    fn close(&self) -> ProtocolResult<()> {
        self.inner.close()
    }

    fn exists(&self, pfn: &str) -> ProtocolResult<bool> {
        self.inner.exists(pfn)
    }

    fn get(&self, pfn: &str, destination: &Path, _timeout: Option<Duration>) -> ProtocolResult<()> {
        let path = self.inner.pfn_to_local_path(pfn)?;
        create_link(&path, destination).map_err(|e| classify(e, Side::Destination, destination))?;
        tracing::debug!(
            "symlink {} created for {} from {}",
            destination.display(),
            path.display(),
            pfn
        );

        if let Err(e) = fs::symlink_metadata(destination) {
            tracing::error!("symlink {} could not be created", destination.display());
            return Err(ProtocolError::destination_not_accessible(destination, e));
        }

        if let Err(e) = fs::metadata(destination) {
            tracing::error!(
                "symlink {} appears to be a broken link to {}",
                destination.display(),
                path.display()
            );
            let is_link = fs::symlink_metadata(destination)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if is_link {
                if let Err(rm) = fs::remove_file(destination) {
                    tracing::warn!(path = %destination.display(), "could not remove broken link: {}", rm);
                }
            }
            return Err(ProtocolError::source_not_found(path, e));
        }

        Ok(())
    }

    fn put(
        &self,
        source: &Path,
        target: &str,
        source_dir: Option<&Path>,
        timeout: Option<Duration>,
    ) -> ProtocolResult<()> {
        self.inner.put(source, target, source_dir, timeout)
    }

    fn delete(&self, pfn: &str) -> ProtocolResult<()> {
        self.inner.delete(pfn)
    }

    fn rename(&self, pfn: &str, new_pfn: &str) -> ProtocolResult<()> {
        self.inner.rename(pfn, new_pfn)
    }

    fn stat(&self, pfn: &str) -> ProtocolResult<FileStat> {
        self.inner.stat(pfn)
    }

    fn lfns_to_pfns(&self, lfns: &[Lfn]) -> BTreeMap<String, String> {
        self.inner.lfns_to_pfns(lfns)
    }

    fn pfn_to_local_path(&self, pfn: &str) -> ProtocolResult<PathBuf> {
        self.inner.pfn_to_local_path(pfn)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::protocol::FaultKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SymlinkProtocol) {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("rse");
        let proto = SymlinkProtocol::new(RseAttributes::new(
            "file",
            "localhost",
            prefix.to_str().unwrap(),
        ));
        (dir, proto)
    }

    fn pfn(proto: &SymlinkProtocol, name: &str) -> String {
        proto.lfns_to_pfns(&[Lfn::new("test", name)])[&format!("test:{name}")].clone()
    }

    #[test]
    fn local_path_is_normalized() {
        let (dir, proto) = setup();
        let path = proto.pfn_to_local_path(&pfn(&proto, "file1")).unwrap();
        assert_eq!(
            path.to_str().unwrap(),
            format!("{}/rse/test/80/25/file1", dir.path().display())
        );
    }

    #[test]
    fn get_links_to_stored_file() {
        let (dir, proto) = setup();
        let target = pfn(&proto, "linked");
        let src = dir.path().join("src");
        fs::write(&src, b"linked bytes").unwrap();
        proto.put(&src, &target, None, None).unwrap();

        let dest = dir.path().join("dest");
        proto.get(&target, &dest, None).unwrap();

        assert!(fs::symlink_metadata(&dest).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&dest).unwrap(), proto.pfn_to_local_path(&target).unwrap());
        assert_eq!(fs::read(&dest).unwrap(), b"linked bytes");
    }

    #[test]
    fn get_missing_source_removes_dangling_link() {
        let (dir, proto) = setup();
        let dest = dir.path().join("dangling");
        let err = proto.get(&pfn(&proto, "absent"), &dest, None).unwrap_err();
        assert_eq!(err.kind(), FaultKind::SourceNotFound);
        assert!(fs::symlink_metadata(&dest).is_err(), "broken link must be removed");
    }

    #[test]
    fn get_into_absent_directory_is_destination_not_accessible() {
        let (dir, proto) = setup();
        let err = proto
            .get(&pfn(&proto, "any"), &dir.path().join("no/such/dest"), None)
            .unwrap_err();
        assert_eq!(err.kind(), FaultKind::DestinationNotAccessible);
    }

    #[test]
    fn delete_acts_on_real_file() {
        let (dir, proto) = setup();
        let target = pfn(&proto, "real");
        let src = dir.path().join("src");
        fs::write(&src, b"x").unwrap();
        proto.put(&src, &target, None, None).unwrap();
        proto.delete(&target).unwrap();
        assert!(!proto.exists(&target).unwrap());
        assert_eq!(
            proto.delete(&target).unwrap_err().kind(),
            FaultKind::SourceNotFound
        );
    }
}
