//! Helpers for tests that run against a live MongoDB server. The tests themselves are compiled
//! only with the `integration` feature:
//!
//! ```sh
//! DB_HOST=localhost DB_PORT=27017 cargo test -p integration-tests --features integration
//! ```

use anyhow::Context as _;
use files_manager_db::{mongodb_connection::get_mongodb_client, DbConfig};
use mongodb::{
    bson::{oid::ObjectId, Document},
    Database,
};

/// A port on which nothing is expected to listen.
pub const UNREACHABLE_PORT: u16 = 1;

/// A uniquely-named database on the test server. Each test gets its own so that tests can run in
/// parallel, and so that every test starts from an empty database.
pub struct TestDatabase {
    pub config: DbConfig,
    database: Database,
}

impl TestDatabase {
    /// Finds the server through the same `DB_HOST` and `DB_PORT` variables the application reads.
    /// `DB_DATABASE` is ignored. Must be called from within a tokio runtime.
    pub fn new() -> anyhow::Result<Self> {
        let config = DbConfig::from_env().context("reading test database configuration")?;
        let config = DbConfig {
            database: format!("files_manager_test_{}", ObjectId::new().to_hex()),
            ..config
        };
        let database = get_mongodb_client(&config)?.database(&config.database);
        Ok(TestDatabase { config, database })
    }

    /// Inserts `count` empty documents into the named collection.
    pub async fn insert_documents(
        &self,
        collection_name: &str,
        count: usize,
    ) -> anyhow::Result<()> {
        if count == 0 {
            return Ok(());
        }
        let documents = (0..count).map(|_| Document::new());
        self.database
            .collection::<Document>(collection_name)
            .insert_many(documents, None)
            .await?;
        Ok(())
    }

    pub async fn drop_database(self) -> anyhow::Result<()> {
        self.database.drop(None).await?;
        Ok(())
    }
}

/// Configuration for a server that cannot be reached.
pub fn unreachable_config() -> DbConfig {
    DbConfig::new("127.0.0.1", UNREACHABLE_PORT, "files_manager")
}
