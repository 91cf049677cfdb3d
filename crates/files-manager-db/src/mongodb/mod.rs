mod collection;
mod database;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use self::collection::CollectionTrait;
pub use self::database::DatabaseTrait;

// MockCollectionTrait and MockDatabaseTrait are generated by automock when the cfg is active
#[cfg(any(test, feature = "test-helpers"))]
pub use self::collection::MockCollectionTrait;
#[cfg(any(test, feature = "test-helpers"))]
pub use self::database::MockDatabaseTrait;
