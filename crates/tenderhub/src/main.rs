//! tenderhub - procurement tenders and bids service

use clap::Parser;
use color_eyre::eyre::Result;
use tenderhub::cli::{Cli, Command, serve::apply_legacy_env_migration};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    apply_legacy_env_migration();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(cmd) => cmd.run().await,
        Command::Users(cmd) => cmd.run().await,
        Command::Orgs(cmd) => cmd.run().await,
    }
}
