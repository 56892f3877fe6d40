//! the `users` subcommand - manage employees

use clap::{Args, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tenderhub_db::Database;
use tenderhub_types::{MAX_USERNAME_LEN, User};

use super::db::DbArgs;

/// manage users
#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// create a new user
    Create(CreateUserArgs),

    /// list all users
    List(ListUsersArgs),
}

/// create a new user
#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[command(flatten)]
    db: DbArgs,

    /// username
    username: String,

    /// first name (optional)
    #[arg(long)]
    first_name: Option<String>,

    /// last name (optional)
    #[arg(long)]
    last_name: Option<String>,
}

/// list users
#[derive(Args, Debug)]
pub struct ListUsersArgs {
    #[command(flatten)]
    db: DbArgs,

    /// output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: String,
}

impl UsersCommand {
    /// run the users command
    pub async fn run(self) -> Result<()> {
        match self {
            UsersCommand::Create(args) => create_user(args).await,
            UsersCommand::List(args) => list_users(args).await,
        }
    }
}

async fn create_user(args: CreateUserArgs) -> Result<()> {
    if args.username.is_empty() || args.username.chars().count() > MAX_USERNAME_LEN {
        bail!("username must be 1-{} characters", MAX_USERNAME_LEN);
    }

    let db = args.db.connect().await?;

    if db
        .get_user_by_name(&args.username)
        .await
        .context("failed to check for existing user")?
        .is_some()
    {
        bail!("user '{}' already exists", args.username);
    }

    let mut user = User::new(args.username);
    user.first_name = args.first_name;
    user.last_name = args.last_name;

    let created = db
        .create_user(&user)
        .await
        .context("failed to create user")?;

    println!("Created user:");
    println!("  ID:       {}", created.id);
    println!("  Username: {}", created.username);
    println!("  Name:     {}", created.display());

    Ok(())
}

async fn list_users(args: ListUsersArgs) -> Result<()> {
    let db = args.db.connect().await?;

    let users = db.list_users().await.context("failed to list users")?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:<38} {:<20} {:<30}", "ID", "USERNAME", "DISPLAY NAME");
    println!("{}", "-".repeat(88));

    for user in users {
        println!(
            "{:<38} {:<20} {:<30}",
            user.id.to_string(),
            user.username,
            user.display(),
        );
    }

    Ok(())
}
