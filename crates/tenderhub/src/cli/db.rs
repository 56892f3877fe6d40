//! database arguments shared by the admin subcommands.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tenderhub_db::TenderhubDb;

use super::serve::resolve_config;

/// where to find the database
#[derive(Args, Debug)]
pub struct DbArgs {
    /// path to config file (toml format)
    #[arg(short, long, env = "TENDERHUB_CONFIG")]
    config: Option<PathBuf>,

    /// database url (sqlite:// or postgres://)
    #[arg(long, env = "TENDERHUB_DATABASE_URL")]
    database_url: Option<String>,
}

impl DbArgs {
    /// open the database. migrations run on connect.
    pub async fn connect(&self) -> Result<TenderhubDb> {
        let config = resolve_config(self.config.as_ref(), self.database_url.as_deref())?;
        TenderhubDb::new(&config)
            .await
            .context("failed to connect to database")
    }
}
