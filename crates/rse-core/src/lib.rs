pub mod config;
pub mod logging;

pub mod checksum;
pub mod pfn;
pub mod protocol;

pub use pfn::{Lfn, ParsedPfn, PfnMapper};
pub use protocol::{build_protocol, FaultKind, FileStat, ProtocolError, RseProtocol};
