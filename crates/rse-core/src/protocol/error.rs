//! Fault taxonomy surfaced to orchestration callers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Category of a [`ProtocolError`], stable across storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    SourceNotFound,
    DestinationNotAccessible,
    ServiceUnavailable,
    /// Reserved for backends whose `connect` can fail.
    RseAccessDenied,
    FileNameNotSupported,
}

/// Error returned by every protocol operation. I/O faults keep the
/// originating `io::Error` as their source.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("source not found: {}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination not accessible: {}", .path.display())]
    DestinationNotAccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("service unavailable: {context}")]
    ServiceUnavailable {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("access denied to storage element: {0}")]
    RseAccessDenied(String),

    #[error("unsupported file name {pfn}: {reason}")]
    FileNameNotSupported { pfn: String, reason: String },
}

impl ProtocolError {
    pub fn kind(&self) -> FaultKind {
        match self {
            ProtocolError::SourceNotFound { .. } => FaultKind::SourceNotFound,
            ProtocolError::DestinationNotAccessible { .. } => FaultKind::DestinationNotAccessible,
            ProtocolError::ServiceUnavailable { .. } => FaultKind::ServiceUnavailable,
            ProtocolError::RseAccessDenied(_) => FaultKind::RseAccessDenied,
            ProtocolError::FileNameNotSupported { .. } => FaultKind::FileNameNotSupported,
        }
    }

    pub(crate) fn source_not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProtocolError::SourceNotFound {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn destination_not_accessible(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProtocolError::DestinationNotAccessible {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unavailable(context: impl Into<String>, source: io::Error) -> Self {
        ProtocolError::ServiceUnavailable {
            context: context.into(),
            source,
        }
    }
}
