use async_trait::async_trait;
use mongodb::{bson::Document, error::Error, Database};

#[cfg(any(test, feature = "test-helpers"))]
use mockall::automock;

use super::CollectionTrait;

#[cfg(any(test, feature = "test-helpers"))]
use super::MockCollectionTrait;

/// Abstract MongoDB database methods. This lets us mock a database connection in tests. The
/// automock attribute generates a struct called MockDatabaseTrait that implements this trait. The
/// mock provides a variety of methods for mocking and spying on database behavior in tests. See
/// https://docs.rs/mockall/latest/mockall/
///
/// The `Collection` type is fixed to collections of `Document`. Counting does not need typed
/// documents.
#[cfg_attr(any(test, feature = "test-helpers"), automock(
    type Collection = MockCollectionTrait;
))]
#[async_trait]
pub trait DatabaseTrait {
    type Collection: CollectionTrait;

    async fn run_command(&self, command: Document) -> Result<Document, Error>;

    fn collection(&self, name: &str) -> Self::Collection;
}

#[async_trait]
impl DatabaseTrait for Database {
    type Collection = mongodb::Collection<Document>;

    async fn run_command(&self, command: Document) -> Result<Document, Error> {
        Database::run_command(self, command, None).await
    }

    fn collection(&self, name: &str) -> Self::Collection {
        Database::collection::<Document>(self, name)
    }
}
