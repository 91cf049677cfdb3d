#![cfg(feature = "integration")]

use files_manager_db::{DbClient, Stats};
use integration_tests::TestDatabase;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn fresh_database_has_no_users_or_files() -> anyhow::Result<()> {
    let test_db = TestDatabase::new()?;
    let client = DbClient::new(test_db.config.clone());
    client.connect().await;

    assert!(client.is_alive());
    assert_eq!(client.nb_users().await, 0);
    assert_eq!(client.nb_files().await, 0);

    test_db.drop_database().await
}

#[tokio::test]
async fn counts_inserted_users() -> anyhow::Result<()> {
    let test_db = TestDatabase::new()?;
    let client = DbClient::new(test_db.config.clone());
    client.connect().await;

    test_db.insert_documents("users", 5).await?;
    assert_eq!(client.nb_users().await, 5);
    assert_eq!(client.try_count_records("users").await?, 5);
    assert_eq!(client.nb_files().await, 0);

    test_db.drop_database().await
}

#[tokio::test]
async fn counts_are_stable_without_writes() -> anyhow::Result<()> {
    let test_db = TestDatabase::new()?;
    let client = DbClient::new(test_db.config.clone());
    client.connect().await;

    test_db.insert_documents("users", 2).await?;
    test_db.insert_documents("files", 4).await?;
    let first = client.stats().await;
    let second = client.stats().await;
    assert_eq!(first, Stats { users: 2, files: 4 });
    assert_eq!(first, second);

    test_db.drop_database().await
}
