//! Classify `io::Error`s into protocol faults.
//!
//! "Not found" alone does not say which side of a transfer is missing; the
//! caller states the side after running its own disambiguation check.

use std::io;
use std::path::Path;

use super::error::ProtocolError;

/// Which end of an operation an I/O failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

pub fn is_not_found(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::NotFound
}

/// Map `e` at `side` for `path`: not-found becomes `SourceNotFound` or
/// `DestinationNotAccessible`, everything else `ServiceUnavailable`.
pub fn classify(e: io::Error, side: Side, path: &Path) -> ProtocolError {
    if !is_not_found(&e) {
        return unclassified(e, path);
    }
    match side {
        Side::Source => ProtocolError::source_not_found(path, e),
        Side::Destination => ProtocolError::destination_not_accessible(path, e),
    }
}

/// Any failure without a more specific category.
pub fn unclassified(e: io::Error, path: &Path) -> ProtocolError {
    ProtocolError::unavailable(path.display().to_string(), e)
}
