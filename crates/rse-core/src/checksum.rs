//! File digests reported by `stat`.
//!
//! Computed on demand by streaming the file in fixed-size chunks. Adler-32 is
//! rendered as 8 zero-padded lowercase hex digits; SHA-256 as 64.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Adler32,
    Sha256,
}

impl ChecksumAlgorithm {
    /// Digest of the file at `path` as lowercase hex.
    pub fn digest_path(self, path: &Path) -> io::Result<String> {
        match self {
            ChecksumAlgorithm::Adler32 => adler32_path(path),
            ChecksumAlgorithm::Sha256 => sha256_path(path),
        }
    }
}

fn for_each_chunk(path: &Path, mut f: impl FnMut(&[u8])) -> io::Result<()> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        f(&buf[..n]);
    }
}

/// Compute Adler-32 of a file, formatted as `%08x`.
pub fn adler32_path(path: &Path) -> io::Result<String> {
    let mut adler = adler2::Adler32::new();
    for_each_chunk(path, |chunk| adler.write_slice(chunk))?;
    Ok(format!("{:08x}", adler.checksum()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    let mut hasher = Sha256::new();
    for_each_chunk(path, |chunk| hasher.update(chunk))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn adler32_path_empty_file_is_one() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(adler32_path(f.path()).unwrap(), "00000001");
    }

    #[test]
    fn adler32_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"Wikipedia").unwrap();
        f.flush().unwrap();
        assert_eq!(adler32_path(f.path()).unwrap(), "11e60398");
    }

    #[test]
    fn digest_path_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChecksumAlgorithm::Adler32
            .digest_path(&dir.path().join("absent"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
