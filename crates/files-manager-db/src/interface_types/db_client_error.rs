use thiserror::Error;

/// Failures inside the connection manager. These never reach callers of
/// [crate::DbClient::count_records]; they are visible through
/// [crate::DbClient::try_count_records] so that "zero documents" and "query failed" can be told
/// apart internally.
#[derive(Debug, Error)]
pub enum DbClientError {
    #[error("not connected to the database")]
    NotConnected,

    #[error("{0}")]
    MongoDB(#[from] mongodb::error::Error),
}
