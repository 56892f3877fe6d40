//! cli subcommands for tenderhub.
//!
//! - `tenderhub serve` - run the http api server
//! - `tenderhub users create|list` - seed employees
//! - `tenderhub orgs create|list|add-responsible` - seed organizations

mod db;
mod orgs;
pub mod serve;
mod users;

pub use db::DbArgs;
pub use orgs::OrgsCommand;
pub use serve::ServeCommand;
pub use users::UsersCommand;

use clap::{Parser, Subcommand};

/// tenderhub - procurement tenders and bids service
#[derive(Parser, Debug)]
#[command(name = "tenderhub")]
#[command(about = "Procurement tenders and bids service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// run the api server
    Serve(ServeCommand),

    /// manage users
    #[command(subcommand)]
    Users(UsersCommand),

    /// manage organizations
    #[command(subcommand)]
    Orgs(OrgsCommand),
}
