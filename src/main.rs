//! `discovery`: list catalog services and fetch their discovery documents.

use clap::Parser;

use discovery_registry::cli::{Cli, run_discovery_command};
use discovery_registry::config::Config;
use discovery_registry::tracing_fmt::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_tracing(cli.verbose, &config.logging)?;

    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }

    run_discovery_command(cli.command, &config).await
}
