//! # Runtime Configuration
//!
//! Environment-driven settings for processes that open the database.
//!
//! ## Variables
//! ```text
//! ┌──────────────────────────┬──────────────┬──────────────────────────────┐
//! │ Variable                 │ Default      │ Meaning                      │
//! ├──────────────────────────┼──────────────┼──────────────────────────────┤
//! │ BOZOR_DATABASE_PATH      │ ./bozor.db   │ SQLite file                  │
//! │ BOZOR_DB_MAX_CONNECTIONS │ 5            │ Pool size                    │
//! │ BOZOR_RUN_MIGRATIONS     │ true         │ Apply migrations on connect  │
//! │ BOZOR_UPLOAD_ROOT        │ media        │ Root for stored upload paths │
//! └──────────────────────────┴──────────────┴──────────────────────────────┘
//! ```

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::pool::DbConfig;

pub const DATABASE_PATH_VAR: &str = "BOZOR_DATABASE_PATH";
pub const MAX_CONNECTIONS_VAR: &str = "BOZOR_DB_MAX_CONNECTIONS";
pub const RUN_MIGRATIONS_VAR: &str = "BOZOR_RUN_MIGRATIONS";
pub const UPLOAD_ROOT_VAR: &str = "BOZOR_UPLOAD_ROOT";

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be true or false, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub run_migrations: bool,
    /// Directory the relative upload paths are resolved against.
    pub upload_root: PathBuf,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            database_path: PathBuf::from("./bozor.db"),
            max_connections: 5,
            run_migrations: true,
            upload_root: PathBuf::from("media"),
        }
    }
}

impl MarketConfig {
    /// Reads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = MarketConfig::default();

        if let Some(path) = lookup(DATABASE_PATH_VAR) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: MAX_CONNECTIONS_VAR,
                        value: raw,
                    })
                }
            };
        }

        if let Some(raw) = lookup(RUN_MIGRATIONS_VAR) {
            config.run_migrations = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        var: RUN_MIGRATIONS_VAR,
                        value: raw,
                    })
                }
            };
        }

        if let Some(root) = lookup(UPLOAD_ROOT_VAR) {
            config.upload_root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .run_migrations(self.run_migrations)
    }

    /// Filesystem location of a stored upload path.
    pub fn upload_location(&self, relative: &str) -> PathBuf {
        self.upload_root.join(relative)
    }
}
