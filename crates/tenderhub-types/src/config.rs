//! configuration types for tenderhub

use serde::{Deserialize, Serialize};

use crate::Error;

/// main configuration for tenderhub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// address to bind the http server to.
    pub listen_addr: String,

    /// database configuration.
    pub database: DatabaseConfig,

    /// log level: trace, debug, info, warn or error.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database: DatabaseConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// check the parts of the config that serde cannot.
    pub fn validate(&self) -> Result<(), Error> {
        if self.listen_addr.is_empty() {
            return Err(Error::Config("listen_addr cannot be empty".into()));
        }
        match self.database.db_type.as_str() {
            "sqlite" | "postgres" => {}
            other => {
                return Err(Error::Config(format!(
                    "unsupported database type: {other} (expected sqlite or postgres)"
                )));
            }
        }
        if self.database.connection_string.is_empty() {
            return Err(Error::Config(
                "database connection_string cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// database type: "sqlite" or "postgres".
    pub db_type: String,

    /// database connection string or file path.
    pub connection_string: String,

    /// enable write-ahead logging (sqlite only).
    pub write_ahead_log: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: "sqlite".to_string(),
            connection_string: "/var/lib/tenderhub/db.sqlite".to_string(),
            write_ahead_log: true,
        }
    }
}
