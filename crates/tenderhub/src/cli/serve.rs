//! the `serve` subcommand - runs the http api server.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::eyre::{Context, Result, bail};
use tenderhub_db::TenderhubDb;
use tenderhub_types::{Config, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

/// default config file search paths (in order of priority).
const CONFIG_SEARCH_PATHS: &[&str] = &[
    "/etc/tenderhub/config.toml",
    "~/.config/tenderhub/config.toml",
    "./config.toml",
];

/// legacy variable names and the tenderhub_* variables they feed.
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("SERVER_ADDRESS", "TENDERHUB_LISTEN_ADDR"),
    ("POSTGRES_CONN", "TENDERHUB_DATABASE_URL"),
];

/// pick the value to use for a migrated variable (tenderhub_* takes precedence).
fn migrate_env_var(legacy_val: Option<&str>, current_val: Option<&str>) -> Option<String> {
    match (current_val, legacy_val) {
        (Some(current), _) => Some(current.to_string()),
        (None, Some(legacy)) => Some(legacy.to_string()),
        (None, None) => None,
    }
}

/// apply legacy -> tenderhub_* environment variable migration.
///
/// deployments of the older service configure the listen address and
/// database through `SERVER_ADDRESS` and `POSTGRES_CONN`. when the
/// tenderhub_* variable is unset, it is filled from the legacy one.
///
/// call this before clap parses arguments.
pub fn apply_legacy_env_migration() {
    use std::env;

    for (legacy_key, key) in LEGACY_ENV_VARS {
        let current = env::var(key).ok();
        let legacy = env::var(legacy_key).ok();

        let value = migrate_env_var(legacy.as_deref(), current.as_deref());
        if current.is_none()
            && let Some(value) = value
        {
            tracing::debug!("Migrating {} -> {}", legacy_key, key);
            // SAFETY: we're setting env vars before any threads are spawned,
            // during CLI initialization.
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

/// run the tenderhub api server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// path to config file (toml format)
    #[arg(short, long, env = "TENDERHUB_CONFIG")]
    config: Option<PathBuf>,

    /// database url (sqlite:// or postgres://)
    #[arg(long, env = "TENDERHUB_DATABASE_URL")]
    database_url: Option<String>,

    /// address to listen on
    #[arg(long, env = "TENDERHUB_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// log level
    #[arg(long, env = "TENDERHUB_LOG_LEVEL")]
    log_level: Option<String>,
}

/// read and parse a toml config file.
fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config file: {:?}", path))
}

/// map a configured log level to a tracing level. unknown names fall back
/// to info.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// find and load config file, returning none if no config file is found.
pub(crate) fn load_config_file(config_path: Option<&PathBuf>) -> Result<Option<Config>> {
    // if explicit path provided, it must exist
    if let Some(path) = config_path {
        return read_config(path).map(Some);
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = expand_tilde::expand_tilde(path_str)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| PathBuf::from(path_str));
        if path.exists() {
            debug!("Found config file at {:?}", path);
            return read_config(&path).map(Some);
        }
    }

    Ok(None)
}

/// load the config file (or defaults) and apply a database url override.
pub(crate) fn resolve_config(
    config_path: Option<&PathBuf>,
    database_url: Option<&str>,
) -> Result<Config> {
    let mut config = match load_config_file(config_path)? {
        Some(file_config) => {
            info!("Loaded configuration from file");
            file_config
        }
        None => {
            debug!("No config file found, using defaults");
            Config::default()
        }
    };
    if let Some(db_url) = database_url {
        config.database = parse_database_url(db_url)?;
    }
    Ok(config)
}

impl ServeCommand {
    /// convert cli arguments into a config struct, merging with config file if present.
    ///
    /// priority order: defaults -> config file -> cli flags / env
    fn into_config(self) -> Result<Config> {
        let mut config = resolve_config(self.config.as_ref(), self.database_url.as_deref())?;

        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// run the serve command
    pub async fn run(self) -> Result<()> {
        let config = self.into_config()?;

        // RUST_LOG directives win over the configured level
        let level = LevelFilter::from_level(parse_level(&config.log_level));
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        info!("Starting tenderhub...");
        info!("Database: {}", config.database.db_type);
        info!("Listen address: {}", config.listen_addr);

        // ensure parent directory exists for sqlite databases
        if config.database.db_type == "sqlite" {
            let db_path = Path::new(&config.database.connection_string);
            if let Some(parent) = db_path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                info!("Creating database directory: {:?}", parent);
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory: {:?}", parent)
                })?;
            }
        }

        let db = TenderhubDb::new(&config)
            .await
            .context("failed to initialize database")?;
        info!("Database initialized successfully");

        let addr: SocketAddr = config
            .listen_addr
            .parse()
            .context("invalid listen address")?;

        let app = crate::create_app(db);

        info!("Starting HTTP server on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await.context("server error")?;

        Ok(())
    }
}

/// parse a database url into databaseconfig.
pub(crate) fn parse_database_url(db_url: &str) -> Result<DatabaseConfig> {
    let parsed =
        url::Url::parse(db_url).with_context(|| format!("invalid database URL: {}", db_url))?;
    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(DatabaseConfig {
            db_type: "postgres".to_string(),
            connection_string: db_url.to_string(),
            ..Default::default()
        }),
        "sqlite" => Ok(DatabaseConfig {
            db_type: "sqlite".to_string(),
            connection_string: parsed.path().to_string(),
            ..Default::default()
        }),
        scheme => bail!(
            "unsupported database scheme '{}', expected 'sqlite' or 'postgres'",
            scheme
        ),
    }
}
