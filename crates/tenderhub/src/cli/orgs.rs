//! the `orgs` subcommand - manage organizations and their representatives

use clap::{Args, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tenderhub_db::Database;
use tenderhub_types::{Organization, OrganizationId, OrganizationType};

use super::db::DbArgs;

/// manage organizations
#[derive(Subcommand, Debug)]
pub enum OrgsCommand {
    /// create a new organization
    Create(CreateOrgArgs),

    /// list all organizations
    List(ListOrgsArgs),

    /// make a user responsible for an organization
    AddResponsible(AddResponsibleArgs),
}

/// create a new organization
#[derive(Args, Debug)]
pub struct CreateOrgArgs {
    #[command(flatten)]
    db: DbArgs,

    /// organization name
    name: String,

    /// legal form (IE, LLC, JSC)
    #[arg(long = "type", default_value = "LLC")]
    org_type: String,

    /// description (optional)
    #[arg(long)]
    description: Option<String>,
}

/// list organizations
#[derive(Args, Debug)]
pub struct ListOrgsArgs {
    #[command(flatten)]
    db: DbArgs,

    /// output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: String,
}

/// add a responsible user
#[derive(Args, Debug)]
pub struct AddResponsibleArgs {
    #[command(flatten)]
    db: DbArgs,

    /// organization id
    organization_id: OrganizationId,

    /// username of the representative
    username: String,
}

impl OrgsCommand {
    /// run the orgs command
    pub async fn run(self) -> Result<()> {
        match self {
            OrgsCommand::Create(args) => create_org(args).await,
            OrgsCommand::List(args) => list_orgs(args).await,
            OrgsCommand::AddResponsible(args) => add_responsible(args).await,
        }
    }
}

async fn create_org(args: CreateOrgArgs) -> Result<()> {
    let org_type: OrganizationType = args.org_type.parse()?;
    if args.name.is_empty() {
        bail!("organization name cannot be empty");
    }

    let db = args.db.connect().await?;

    let mut org = Organization::new(args.name, org_type);
    org.description = args.description;

    let created = db
        .create_organization(&org)
        .await
        .context("failed to create organization")?;

    println!("Created organization:");
    println!("  ID:   {}", created.id);
    println!("  Name: {}", created.name);
    println!("  Type: {}", created.org_type);

    Ok(())
}

async fn list_orgs(args: ListOrgsArgs) -> Result<()> {
    let db = args.db.connect().await?;

    let orgs = db
        .list_organizations()
        .await
        .context("failed to list organizations")?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&orgs)?);
        return Ok(());
    }

    if orgs.is_empty() {
        println!("No organizations found.");
        return Ok(());
    }

    println!("{:<38} {:<30} {:<6} {:<12}", "ID", "NAME", "TYPE", "RESPONSIBLE");
    println!("{}", "-".repeat(90));

    for org in orgs {
        let responsible = db
            .list_responsible_users(org.id)
            .await
            .context("failed to list responsible users")?;
        println!(
            "{:<38} {:<30} {:<6} {:<12}",
            org.id.to_string(),
            org.name,
            org.org_type.as_str(),
            responsible.len(),
        );
    }

    Ok(())
}

async fn add_responsible(args: AddResponsibleArgs) -> Result<()> {
    let db = args.db.connect().await?;

    let Some(org) = db
        .get_organization(args.organization_id)
        .await
        .context("failed to query organization")?
    else {
        bail!("organization {} not found", args.organization_id);
    };

    let Some(user) = db
        .get_user_by_name(&args.username)
        .await
        .context("failed to query user")?
    else {
        bail!("user '{}' not found", args.username);
    };

    db.add_responsible(org.id, user.id)
        .await
        .with_context(|| format!("failed to add '{}' to {}", user.username, org.name))?;

    println!("{} is now responsible for {}", user.username, org.name);
    Ok(())
}
