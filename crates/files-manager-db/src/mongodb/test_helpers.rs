use std::{collections::BTreeMap, io};

use mongodb::{
    bson::{doc, Document},
    error::Error,
};
use pretty_assertions::assert_eq;

use super::{MockCollectionTrait, MockDatabaseTrait};

/// Produces a driver error of the kind that an unreachable server causes.
pub fn mock_network_error() -> Error {
    Error::from(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

/// Mocks a collection whose `count_documents` call produces the given result. Asserts that the
/// whole collection is counted, i.e. that the filter is empty.
pub fn mock_collection_count(result: Result<u64, Error>) -> MockCollectionTrait {
    let mut collection = MockCollectionTrait::new();
    collection
        .expect_count_documents()
        .returning(move |filter: Document| {
            assert_eq!(filter, doc! {}, "count should not filter documents");
            result.clone()
        });
    collection
}

/// Mocks a database that answers `ping`, and whose collections hold the given numbers of
/// documents. Collections that are not listed are empty.
pub fn mock_reachable_database<'a>(
    counts: impl IntoIterator<Item = (&'a str, u64)>,
) -> MockDatabaseTrait {
    let counts: BTreeMap<String, u64> = counts
        .into_iter()
        .map(|(name, count)| (name.to_owned(), count))
        .collect();

    let mut db = MockDatabaseTrait::new();
    db.expect_run_command().returning(|command| {
        assert_eq!(command, doc! { "ping": 1 }, "unexpected command");
        Ok(doc! { "ok": 1 })
    });
    db.expect_collection().returning(move |name| {
        let count = counts.get(name).copied().unwrap_or(0);
        mock_collection_count(Ok(count))
    });
    db
}

/// Mocks a database server that cannot be reached: every command and every query fails.
pub fn mock_unreachable_database() -> MockDatabaseTrait {
    let mut db = MockDatabaseTrait::new();
    db.expect_run_command()
        .returning(|_| Err(mock_network_error()));
    db.expect_collection()
        .returning(|_| mock_collection_count(Err(mock_network_error())));
    db
}
