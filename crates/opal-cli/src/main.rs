//! opal - a component package installer CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use opal_cli::cmd;
use opal_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Install {
            packages,
            out,
            force,
            remotes,
            proxy,
            concurrency,
            dev,
        } => {
            cmd::install::install(cmd::install::InstallArgs {
                packages,
                out,
                force,
                remotes,
                proxy,
                concurrency,
                dev,
                quiet: cli.quiet,
            })
            .await
        }
    }
}
