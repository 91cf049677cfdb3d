pub mod db_client;
pub mod health;
pub mod interface_types;
pub mod mongodb;
pub mod mongodb_connection;

pub use self::db_client::{ConnectionState, DbClient, Stats, Status};
pub use self::interface_types::{ConfigError, DbClientError, DbConfig};
