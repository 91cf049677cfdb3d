mod db_client_error;
mod db_config;

pub use self::db_client_error::DbClientError;
pub use self::db_config::{
    ConfigError, DbConfig, DB_DATABASE_ENV_VAR, DB_HOST_ENV_VAR, DB_PORT_ENV_VAR,
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT,
};
