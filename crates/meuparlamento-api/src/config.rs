//! meuParlamento API configuration.
//!
//! Configuration is loaded from environment variables. The database URI is
//! redacted in Debug output since it may embed credentials.

use crate::models::VoteMatching;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default MongoDB connection URI.
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "meuParlamento";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default size of the database connection pool.
pub const DEFAULT_MAX_POOL_SIZE: u32 = 200;

/// meuParlamento API configuration.
///
/// Loaded from environment variables with local development defaults.
#[derive(Clone)]
pub struct Config {
    /// MongoDB connection URI.
    pub mongodb_uri: String,

    /// Database holding the `proposals` and `notification_devices` collections.
    pub db_name: String,

    /// Server bind address (default: "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum number of pooled database connections (default: 200).
    pub max_pool_size: u32,

    /// Vote group matching mode (default: exact).
    pub vote_matching: VoteMatching,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mongodb_uri", &"[REDACTED]")
            .field("db_name", &self.db_name)
            .field("bind_address", &self.bind_address)
            .field("max_pool_size", &self.max_pool_size)
            .field("vote_matching", &self.vote_matching)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Empty value for environment variable: {0}")]
    EmptyEnvVar(String),

    #[error("Invalid pool size configuration: {0}")]
    InvalidPoolSize(String),

    #[error("Invalid vote matching configuration: {0}")]
    InvalidVoteMatching(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mongodb_uri = non_empty_var(vars, "MONGODB_URI", DEFAULT_MONGODB_URI)?;
        let db_name = non_empty_var(vars, "DB_NAME", DEFAULT_DB_NAME)?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse pool size with validation
        let max_pool_size = if let Some(value_str) = vars.get("MONGODB_MAX_POOL_SIZE") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidPoolSize(format!(
                    "MONGODB_MAX_POOL_SIZE must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidPoolSize(
                    "MONGODB_MAX_POOL_SIZE must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_MAX_POOL_SIZE
        };

        let vote_matching = match vars.get("VOTE_MATCHING") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidVoteMatching(format!("VOTE_MATCHING {}", e))
            })?,
            None => VoteMatching::default(),
        };

        Ok(Config {
            mongodb_uri,
            db_name,
            bind_address,
            max_pool_size,
            vote_matching,
        })
    }
}

fn non_empty_var(
    vars: &HashMap<String, String>,
    name: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match vars.get(name) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyEnvVar(name.to_string())),
        Some(value) => Ok(value.clone()),
        None => Ok(default.to_string()),
    }
}
