use std::{env, num::ParseIntError};

use thiserror::Error;

pub const DB_HOST_ENV_VAR: &str = "DB_HOST";
pub const DB_PORT_ENV_VAR: &str = "DB_PORT";
pub const DB_DATABASE_ENV_VAR: &str = "DB_DATABASE";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_DATABASE: &str = "files_manager";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for DB_PORT, {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Where to find the database server, and which database on it holds the application's
/// collections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,

    /// Name of the database to connect to
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_owned(),
        }
    }
}

impl DbConfig {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        DbConfig {
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Reads `DB_HOST`, `DB_PORT`, and `DB_DATABASE` from the process environment, using defaults
    /// for any that are unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [DbConfig::from_env], but reads variables through the given function so that
    /// callers (and tests) can supply their own environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let defaults = DbConfig::default();

        let port = match read(DB_PORT_ENV_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        Ok(DbConfig {
            host: read(DB_HOST_ENV_VAR).unwrap_or(defaults.host),
            port,
            database: read(DB_DATABASE_ENV_VAR).unwrap_or(defaults.database),
        })
    }

    pub fn connection_uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}
