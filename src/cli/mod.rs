//! Command-line interface for the `discovery` binary.

mod discovery;

use std::path::PathBuf;

use clap::Parser;

pub use discovery::{DiscoveryCommand, run_discovery_command};

/// Browse the bundled API catalog and fetch discovery documents.
#[derive(Parser, Debug)]
#[command(name = "discovery", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Catalog file to use instead of the bundled one (overrides DISCOVERY_CATALOG_PATH)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: DiscoveryCommand,
}
