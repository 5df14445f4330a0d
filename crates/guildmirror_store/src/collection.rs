//! Collection trait definition.

use crate::Record;
use guildmirror_error::StoreResult;

/// Trait for pluggable collection backends.
///
/// Writers are serialized by the implementation; reads may run
/// concurrently but must never see a torn write.
#[async_trait::async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// Create or replace the record with the same primary key.
    async fn save(&self, record: &R) -> StoreResult<()>;

    /// Remove the record with the given key.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such record exists.
    async fn delete_by_id(&self, id: &str) -> StoreResult<()>;

    /// Fetch the record with the given key.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such record exists.
    async fn get_by_id(&self, id: &str) -> StoreResult<R>;

    /// Every record in the collection, order unspecified.
    async fn list_all(&self) -> StoreResult<Vec<R>>;
}
