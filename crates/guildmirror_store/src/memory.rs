//! In-memory collection backend.

use crate::{Collection, Record};
use guildmirror_error::{StoreError, StoreResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Process-local collection.
///
/// # Example
///
/// ```
/// use guildmirror_core::DirectoryGroup;
/// use guildmirror_store::{Collection, MemoryCollection};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let groups = MemoryCollection::<DirectoryGroup>::new();
/// groups.save(&DirectoryGroup::new("1001")).await?;
/// assert_eq!(groups.list_all().await?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryCollection<R: Record> {
    records: RwLock<BTreeMap<String, R>>,
}

impl<R: Record> MemoryCollection<R> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a collection pre-filled with records.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    #[instrument(skip(self, record), fields(collection = R::COLLECTION, id = record.id()))]
    async fn save(&self, record: &R) -> StoreResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.id().to_string(), record.clone());
        debug!("Saved record");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    async fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(id)
            .map(|_| debug!("Deleted record"))
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    async fn get_by_id(&self, id: &str) -> StoreResult<R> {
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))
    }

    async fn list_all(&self) -> StoreResult<Vec<R>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }
}
