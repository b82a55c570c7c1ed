//! Local filesystem access: files are copied in and out of the prefix.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::classify::{classify, is_not_found, unclassified, Side};
use super::{FileStat, ProtocolError, ProtocolResult, RseProtocol};
use crate::config::RseAttributes;
use crate::pfn::{normalize_path, Lfn, PfnMapper};

/// How a parsed PFN becomes a local path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathResolution {
    /// `prefix/path/name` as composed, redundant separators included.
    Verbatim,
    /// Lexically normalized, for use as a link target.
    Normalized,
}

#[derive(Debug, Clone)]
pub struct PosixProtocol {
    mapper: PfnMapper,
    resolution: PathResolution,
}

impl PosixProtocol {
    pub fn new(attributes: RseAttributes) -> Self {
        Self::with_resolution(attributes, PathResolution::Verbatim)
    }

    pub(crate) fn with_resolution(attributes: RseAttributes, resolution: PathResolution) -> Self {
        Self {
            mapper: PfnMapper::new(attributes),
            resolution,
        }
    }

    pub fn mapper(&self) -> &PfnMapper {
        &self.mapper
    }

    /// Create the storage root one component at a time. Components that
    /// already exist, possibly created by a concurrent writer, are skipped.
    fn bootstrap_storage_root(&self) -> io::Result<()> {
        let root = &self.mapper.attributes().storage_root;
        let mut path = PathBuf::new();
        for component in root.components() {
            path.push(component);
            if !matches!(component, Component::Normal(_)) {
                continue;
            }
            match fs::create_dir(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "created storage root component"),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Recreate a missing storage root and repeat the upload once. Any
    /// failure here is reported unclassified.
    fn retry_after_bootstrap(&self, source_path: &Path, target_path: &Path) -> ProtocolResult<()> {
        let root = &self.mapper.attributes().storage_root;
        tracing::warn!(root = %root.display(), "storage root missing, creating it and retrying");
        self.bootstrap_storage_root()
            .map_err(|e| unclassified(e, root))?;
        copy_into(source_path, target_path).map_err(|e| unclassified(e, target_path))?;
        tracing::debug!(src = %source_path.display(), dest = %target_path.display(), "stored file after bootstrap");
        Ok(())
    }
}

fn is_missing(path: &Path) -> bool {
    matches!(fs::metadata(path), Err(e) if is_not_found(&e))
}

fn path_exists(path: &Path) -> ProtocolResult<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if is_not_found(&e) => Ok(false),
        Err(e) => Err(unclassified(e, path)),
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn copy_into(source: &Path, target: &Path) -> io::Result<()> {
    ensure_parent(target)?;
    fs::copy(source, target)?;
    Ok(())
}

/// Create and remove an empty file at `destination` to tell whether it is writable.
fn check_writable(destination: &Path) -> io::Result<()> {
    File::create(destination)?;
    if let Err(e) = fs::remove_file(destination) {
        tracing::debug!(path = %destination.display(), "write check cleanup failed: {}", e);
    }
    Ok(())
}

impl RseProtocol for PosixProtocol {
    fn connect(&self) -> ProtocolResult<()> {
        Ok(())
    }

    fn close(&self) -> ProtocolResult<()> {
        Ok(())
    }

    fn exists(&self, pfn: &str) -> ProtocolResult<bool> {
        let path = self.pfn_to_local_path(pfn)?;
        path_exists(&path)
    }

    /// Copy the stored file to `destination`, overwriting it. When the copy
    /// fails, an existing file at `destination` is truncated and removed by
    /// the writability check.
    fn get(&self, pfn: &str, destination: &Path, _timeout: Option<Duration>) -> ProtocolResult<()> {
        let source = self.pfn_to_local_path(pfn)?;
        let err = match fs::copy(&source, destination) {
            Ok(bytes) => {
                tracing::debug!(pfn, dest = %destination.display(), bytes, "copied file from storage");
                return Ok(());
            }
            Err(e) => e,
        };

        // The copy failed on one of the two ends; a write check at the destination tells which.
        if let Err(check) = check_writable(destination) {
            return Err(classify(check, Side::Destination, destination));
        }
        Err(classify(err, Side::Source, &source))
    }

    fn put(
        &self,
        source: &Path,
        target: &str,
        source_dir: Option<&Path>,
        _timeout: Option<Duration>,
    ) -> ProtocolResult<()> {
        let target_path = self.pfn_to_local_path(target)?;
        let source_path = match source_dir {
            Some(dir) => dir.join(source),
            None => source.to_path_buf(),
        };

        let err = match copy_into(&source_path, &target_path) {
            Ok(()) => {
                tracing::debug!(src = %source_path.display(), pfn = target, "stored file");
                return Ok(());
            }
            Err(e) => e,
        };

        if is_not_found(&err) && is_missing(&source_path) {
            return Err(ProtocolError::source_not_found(source_path, err));
        }

        if is_missing(&self.mapper.attributes().storage_root) {
            return self.retry_after_bootstrap(&source_path, &target_path);
        }

        Err(ProtocolError::destination_not_accessible(target_path, err))
    }

    fn delete(&self, pfn: &str) -> ProtocolResult<()> {
        let path = self.pfn_to_local_path(pfn)?;
        fs::remove_file(&path).map_err(|e| classify(e, Side::Source, &path))?;
        tracing::debug!(pfn, "deleted file");
        Ok(())
    }

    fn rename(&self, pfn: &str, new_pfn: &str) -> ProtocolResult<()> {
        let path = self.pfn_to_local_path(pfn)?;
        let new_path = self.pfn_to_local_path(new_pfn)?;

        match ensure_parent(&new_path).and_then(|()| fs::rename(&path, &new_path)) {
            Ok(()) => {
                tracing::debug!(from = pfn, to = new_pfn, "renamed file");
                Ok(())
            }
            Err(e) if is_not_found(&e) => {
                if path_exists(&path)? {
                    Err(ProtocolError::destination_not_accessible(new_path, e))
                } else {
                    Err(ProtocolError::source_not_found(path, e))
                }
            }
            Err(e) => Err(unclassified(e, &path)),
        }
    }

    fn stat(&self, pfn: &str) -> ProtocolResult<FileStat> {
        let path = self.pfn_to_local_path(pfn)?;
        let meta = fs::metadata(&path).map_err(|e| classify(e, Side::Source, &path))?;
        let checksum = self
            .mapper
            .attributes()
            .checksum
            .digest_path(&path)
            .map_err(|e| classify(e, Side::Source, &path))?;
        Ok(FileStat {
            filesize: meta.len(),
            checksum,
        })
    }

    fn lfns_to_pfns(&self, lfns: &[Lfn]) -> BTreeMap<String, String> {
        self.mapper.lfns_to_pfns(lfns)
    }

    fn pfn_to_local_path(&self, pfn: &str) -> ProtocolResult<PathBuf> {
        let path = self.mapper.pfn_to_local_path(pfn)?;
        match self.resolution {
            PathResolution::Verbatim => Ok(path),
            PathResolution::Normalized => {
                let path = normalize_path(&path);
                tracing::debug!(pfn, path = %path.display(), "extracted path");
                Ok(path)
            }
        }
    }
}
