//! CLI for the local filesystem storage element.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rse_core::build_protocol;
use rse_core::config::{self, ProtocolVariant};
use std::path::PathBuf;
use std::sync::Arc;

use commands::{
    run_checksum, run_delete, run_exists, run_get, run_lfn2pfn, run_put, run_rename,
    run_resolve, run_stat, run_upload,
};

/// Top-level CLI for the storage element.
#[derive(Debug, Parser)]
#[command(name = "rse")]
#[command(about = "Local filesystem storage element: PFN mapping and file transfers", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/rse/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured retrieval variant.
    #[arg(long, global = true, value_enum)]
    pub variant: Option<VariantArg>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// Copy bytes on get.
    Copy,
    /// Create a symlink to the stored file on get.
    Symlink,
}

impl From<VariantArg> for ProtocolVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Copy => ProtocolVariant::Copy,
            VariantArg::Symlink => ProtocolVariant::Symlink,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the PFN of each `scope:name`.
    Lfn2pfn {
        /// One or more `scope:name` identifiers.
        #[arg(required = true)]
        dids: Vec<String>,
        /// Explicit path relative to the prefix (single identifier only).
        #[arg(long)]
        path: Option<String>,
    },

    /// Print the local filesystem path of a PFN.
    Resolve { pfn: String },

    /// Check whether a PFN exists on the storage element.
    Exists { pfn: String },

    /// Retrieve a file to a local destination.
    Get { pfn: String, dest: PathBuf },

    /// Store a local file at a PFN.
    Put {
        source: PathBuf,
        target: String,
        /// Directory the source path is relative to.
        #[arg(long)]
        source_dir: Option<PathBuf>,
    },

    /// Delete a file from the storage element.
    Delete { pfn: String },

    /// Rename a file on the storage element.
    Rename { pfn: String, new_pfn: String },

    /// Print size and checksum of a stored file as JSON.
    Stat { pfn: String },

    /// Upload local files under a scope, named after their file names.
    Upload {
        scope: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Upload up to N files concurrently (default 1).
        #[arg(long, default_value = "1", value_name = "N")]
        jobs: usize,
    },

    /// Compute the configured checksum of a local file.
    Checksum { path: PathBuf },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        if let Some(variant) = cli.variant {
            cfg.variant = variant.into();
        }
        tracing::debug!("loaded config: {:?}", cfg);

        let protocol: Arc<dyn rse_core::RseProtocol> = Arc::from(build_protocol(&cfg));
        protocol.connect()?;

        let result = match cli.command {
            CliCommand::Lfn2pfn { dids, path } => run_lfn2pfn(protocol.as_ref(), &dids, path),
            CliCommand::Resolve { pfn } => run_resolve(protocol.as_ref(), &pfn),
            CliCommand::Exists { pfn } => run_exists(protocol.as_ref(), &pfn),
            CliCommand::Get { pfn, dest } => run_get(protocol.as_ref(), &pfn, &dest),
            CliCommand::Put {
                source,
                target,
                source_dir,
            } => run_put(protocol.as_ref(), &source, &target, source_dir.as_deref()),
            CliCommand::Delete { pfn } => run_delete(protocol.as_ref(), &pfn),
            CliCommand::Rename { pfn, new_pfn } => run_rename(protocol.as_ref(), &pfn, &new_pfn),
            CliCommand::Stat { pfn } => run_stat(protocol.as_ref(), &pfn),
            CliCommand::Upload { scope, files, jobs } => {
                run_upload(Arc::clone(&protocol), &scope, files, jobs)
                    .await
                    .map(|_| ())
            }
            CliCommand::Checksum { path } => run_checksum(&cfg, &path),
        };

        protocol.close()?;
        result
    }
}

#[cfg(test)]
mod tests;
