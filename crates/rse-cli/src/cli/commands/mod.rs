//! CLI command handlers. Each command is in its own file.

mod checksum;
mod delete;
mod exists;
mod get;
mod lfn2pfn;
mod put;
mod rename;
mod resolve;
mod stat;
mod upload;

pub use checksum::run_checksum;
pub use delete::run_delete;
pub use exists::run_exists;
pub use get::run_get;
pub use lfn2pfn::run_lfn2pfn;
pub use put::run_put;
pub use rename::run_rename;
pub use resolve::run_resolve;
pub use stat::run_stat;
pub use upload::run_upload;
