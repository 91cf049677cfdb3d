use async_trait::async_trait;
use mongodb::{bson::Document, error::Error, Collection};

#[cfg(any(test, feature = "test-helpers"))]
use mockall::automock;

/// Abstract MongoDB collection methods. This lets us mock a database connection in tests. The
/// automock attribute generates a struct called MockCollectionTrait that implements this trait.
/// See https://docs.rs/mockall/latest/mockall/
#[cfg_attr(any(test, feature = "test-helpers"), automock)]
#[async_trait]
pub trait CollectionTrait {
    /// Counts documents matching `filter`. An empty filter counts the whole collection. A
    /// collection that does not exist counts as empty.
    async fn count_documents(&self, filter: Document) -> Result<u64, Error>;
}

#[async_trait]
impl CollectionTrait for Collection<Document> {
    async fn count_documents(&self, filter: Document) -> Result<u64, Error> {
        Collection::count_documents(self, filter, None).await
    }
}
