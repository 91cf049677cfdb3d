use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use futures::join;
use mongodb::{bson::doc, Database};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::{
    health::ping,
    interface_types::{DbClientError, DbConfig},
    mongodb::{CollectionTrait, DatabaseTrait},
    mongodb_connection::get_mongodb_client,
};

pub const USERS_COLLECTION: &str = "users";
pub const FILES_COLLECTION: &str = "files";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Document counts for the application's collections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub users: u64,
    pub files: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Status {
    pub db: bool,
}

/// Owns the one connection to the database server. Construction never touches the network; call
/// [DbClient::connect] (or [DbClient::spawn_connect]) to establish the connection. Once connected
/// the client stays connected for the rest of its life: dropped connections are not detected and
/// there is no reconnect.
///
/// None of the query methods return errors. Failures are logged and reported as `false` from
/// [DbClient::is_alive] or as a count of zero. Use [DbClient::try_count_records] to see the
/// underlying error.
#[derive(Debug)]
pub struct DbClient<D = Database> {
    config: DbConfig,

    /// `None` if the driver rejected the client options. Such a client never connects.
    database: Option<D>,

    connected: AtomicBool,
}

impl DbClient<Database> {
    /// Creates a client for the configured server in the disconnected state. If the driver
    /// cannot build a client from the configuration the failure is logged and the returned
    /// client stays disconnected.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: DbConfig) -> Self {
        let database = match get_mongodb_client(&config) {
            Ok(client) => Some(client.database(&config.database)),
            Err(err) => {
                error!(%err, uri = %config.connection_uri(), "could not create MongoDB client");
                None
            }
        };
        DbClient {
            config,
            database,
            connected: AtomicBool::new(false),
        }
    }

    /// Creates a client and starts connecting in the background. Returns immediately; the client
    /// reports `is_alive() == false` until the connection attempt succeeds.
    pub fn init(config: DbConfig) -> Arc<Self> {
        let client = Arc::new(Self::new(config));
        // The task is detached. Its outcome is logged, and observable through `is_alive`.
        drop(client.spawn_connect());
        client
    }
}

impl<D> DbClient<D>
where
    D: DatabaseTrait,
{
    /// Wraps an existing database handle, in the disconnected state.
    pub fn with_database(config: DbConfig, database: D) -> Self {
        DbClient {
            config,
            database: Some(database),
            connected: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn connection_state(&self) -> ConnectionState {
        if self.connected.load(Ordering::Acquire) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// True only once a connection attempt has succeeded.
    pub fn is_alive(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Attempts to connect by pinging the configured database. A failed attempt is logged and
    /// leaves the client disconnected. Calling this on a connected client does nothing.
    #[instrument(skip_all, fields(uri = %self.config.connection_uri(), database = %self.config.database))]
    pub async fn connect(&self) -> ConnectionState {
        if self.is_alive() {
            return ConnectionState::Connected;
        }
        let Some(database) = &self.database else {
            error!("MongoDB connection error: no client available");
            return ConnectionState::Disconnected;
        };
        match ping(database).await {
            Ok(()) => {
                self.connected.store(true, Ordering::Release);
                info!("connected to MongoDB");
                ConnectionState::Connected
            }
            Err(err) => {
                error!(%err, "MongoDB connection error");
                ConnectionState::Disconnected
            }
        }
    }

    /// Counts the documents in the named collection of the configured database. A collection that
    /// does not exist has zero documents.
    pub async fn try_count_records(&self, collection_name: &str) -> Result<u64, DbClientError> {
        if !self.is_alive() {
            return Err(DbClientError::NotConnected);
        }
        let database = self.database.as_ref().ok_or(DbClientError::NotConnected)?;
        let count = database
            .collection(collection_name)
            .count_documents(doc! {})
            .await?;
        debug!(collection = collection_name, count, "counted documents");
        Ok(count)
    }

    /// Like [DbClient::try_count_records], but any failure is logged and reported as zero. Callers
    /// cannot tell an empty collection from a failed query.
    pub async fn count_records(&self, collection_name: &str) -> u64 {
        match self.try_count_records(collection_name).await {
            Ok(count) => count,
            Err(err) => {
                error!(collection = collection_name, %err, "error counting documents");
                0
            }
        }
    }

    pub async fn nb_users(&self) -> u64 {
        self.count_records(USERS_COLLECTION).await
    }

    pub async fn nb_files(&self) -> u64 {
        self.count_records(FILES_COLLECTION).await
    }

    /// Counts users and files concurrently.
    pub async fn stats(&self) -> Stats {
        let (users, files) = join!(self.nb_users(), self.nb_files());
        Stats { users, files }
    }

    pub fn status(&self) -> Status {
        Status {
            db: self.is_alive(),
        }
    }
}

impl<D> DbClient<D>
where
    D: DatabaseTrait + Send + Sync + 'static,
{
    /// Runs [DbClient::connect] on a background task.
    pub fn spawn_connect(self: &Arc<Self>) -> JoinHandle<ConnectionState> {
        let client = Arc::clone(self);
        tokio::spawn(async move { client.connect().await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc};

    use mongodb::bson::doc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::mongodb::{
        test_helpers::{
            mock_collection_count, mock_network_error, mock_reachable_database,
            mock_unreachable_database,
        },
        MockDatabaseTrait,
    };

    fn client_for(database: MockDatabaseTrait) -> DbClient<MockDatabaseTrait> {
        DbClient::with_database(DbConfig::default(), database)
    }

    #[tokio::test]
    async fn is_not_alive_before_connecting() {
        // no expectations: any call into the database would panic
        let client = client_for(MockDatabaseTrait::new());
        assert!(!client.is_alive());
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
        assert_eq!(client.status(), Status { db: false });
    }

    #[tokio::test]
    async fn counts_zero_without_querying_before_connecting() {
        let client = client_for(MockDatabaseTrait::new());
        assert!(matches!(
            client.try_count_records("users").await,
            Err(DbClientError::NotConnected)
        ));
        assert_eq!(client.nb_users().await, 0);
        assert_eq!(client.nb_files().await, 0);
    }

    #[tokio::test]
    async fn is_alive_after_successful_connect() {
        let client = client_for(mock_reachable_database([]));
        assert_eq!(client.connect().await, ConnectionState::Connected);
        assert!(client.is_alive());
        assert_eq!(client.status(), Status { db: true });
    }

    #[tokio::test]
    async fn fresh_database_has_no_users_or_files() {
        let client = client_for(mock_reachable_database([]));
        client.connect().await;
        assert!(client.is_alive());
        assert_eq!(client.nb_users().await, 0);
        assert_eq!(client.nb_files().await, 0);
    }

    #[tokio::test]
    async fn counts_documents_in_named_collections() {
        let client = client_for(mock_reachable_database([("users", 5), ("files", 12)]));
        client.connect().await;
        assert_eq!(client.nb_users().await, 5);
        assert_eq!(client.nb_files().await, 12);
        assert_eq!(client.try_count_records("users").await.ok(), Some(5));
        assert_eq!(client.count_records("folders").await, 0);
    }

    #[tokio::test]
    async fn repeated_counts_return_the_same_value() {
        let client = client_for(mock_reachable_database([("users", 3)]));
        client.connect().await;
        let first = client.nb_users().await;
        let second = client.nb_users().await;
        assert_eq!(first, 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stays_disconnected_when_server_is_unreachable() {
        let client = client_for(mock_unreachable_database());
        assert_eq!(client.connect().await, ConnectionState::Disconnected);
        assert!(!client.is_alive());
        assert_eq!(client.nb_users().await, 0);
        assert_eq!(client.nb_files().await, 0);
        assert_eq!(client.stats().await, Stats { users: 0, files: 0 });
    }

    #[tokio::test]
    async fn does_not_ping_again_once_connected() {
        let mut db = MockDatabaseTrait::new();
        db.expect_run_command()
            .times(1)
            .returning(|_| Ok(doc! { "ok": 1 }));
        let client = client_for(db);
        assert_eq!(client.connect().await, ConnectionState::Connected);
        assert_eq!(client.connect().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn may_connect_after_a_failed_attempt() {
        let mut db = MockDatabaseTrait::new();
        let mut seq = mockall::Sequence::new();
        db.expect_run_command()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(mock_network_error()));
        db.expect_run_command()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(doc! { "ok": 1 }));
        let client = client_for(db);
        assert_eq!(client.connect().await, ConnectionState::Disconnected);
        assert_eq!(client.connect().await, ConnectionState::Connected);
        assert!(client.is_alive());
    }

    #[tokio::test]
    async fn query_failure_reports_zero_and_exposes_error() {
        let mut db = MockDatabaseTrait::new();
        db.expect_run_command().returning(|_| Ok(doc! { "ok": 1 }));
        db.expect_collection()
            .returning(|_| mock_collection_count(Err(mock_network_error())));
        let client = client_for(db);
        client.connect().await;

        assert!(client.is_alive());
        assert_eq!(client.nb_users().await, 0);
        let result = client.try_count_records("users").await;
        assert!(
            matches!(result, Err(DbClientError::MongoDB(_))),
            "expected driver error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failure_counting_one_collection_does_not_affect_the_other() {
        let mut db = MockDatabaseTrait::new();
        db.expect_run_command().returning(|_| Ok(doc! { "ok": 1 }));
        db.expect_collection().returning(|name| match name {
            "users" => mock_collection_count(Err(mock_network_error())),
            _ => mock_collection_count(Ok(7)),
        });
        let client = client_for(db);
        client.connect().await;

        assert_eq!(client.stats().await, Stats { users: 0, files: 7 });
    }

    #[tokio::test]
    async fn spawned_connect_completes_in_background() -> anyhow::Result<()> {
        let client = Arc::new(client_for(mock_reachable_database([("files", 2)])));
        let state = client.spawn_connect().await?;
        assert_eq!(state, ConnectionState::Connected);
        assert!(client.is_alive());
        assert_eq!(client.nb_files().await, 2);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn is_not_alive_while_connect_is_pending() -> anyhow::Result<()> {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        // The ping blocks its worker thread until released. No collection expectation: counting
        // while disconnected must not reach the database.
        let mut db = MockDatabaseTrait::new();
        db.expect_run_command().times(1).returning(move |_| {
            started_tx.send(()).expect("test is waiting for ping");
            release_rx.recv().expect("test releases ping");
            Ok(doc! { "ok": 1 })
        });
        let client = Arc::new(client_for(db));

        let handle = client.spawn_connect();
        started_rx.recv()?;

        assert!(!client.is_alive());
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
        assert_eq!(client.nb_users().await, 0);
        assert_eq!(client.nb_files().await, 0);

        release_tx.send(())?;
        assert_eq!(handle.await?, ConnectionState::Connected);
        assert!(client.is_alive());
        Ok(())
    }

    #[tokio::test]
    async fn constructing_client_for_unreachable_server_does_not_fail() {
        // nothing listens on port 1; construction must not touch the network
        let client = DbClient::new(DbConfig::new("127.0.0.1", 1, "files_manager"));
        assert!(!client.is_alive());
        assert_eq!(client.nb_users().await, 0);
        assert_eq!(client.config().port, 1);
    }

    #[test]
    fn serializes_stats_and_status() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_value(Stats { users: 5, files: 2 })?,
            json!({ "users": 5, "files": 2 })
        );
        assert_eq!(
            serde_json::to_value(Status { db: true })?,
            json!({ "db": true })
        );
        assert_eq!(
            serde_json::to_value(ConnectionState::Disconnected)?,
            json!("disconnected")
        );
        Ok(())
    }
}
