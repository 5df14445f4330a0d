//! JSON-file collection backend.
//!
//! Each collection is one file, `{dir}/{collection}.json`, holding a JSON
//! array of records. The file is rewritten on every change through a temp
//! file and a rename, so a crash leaves either the old or the new contents.

use crate::{Collection, Record};
use derive_getters::Getters;
use guildmirror_error::{StoreError, StoreErrorKind, StoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Write-through collection persisted as a JSON file.
#[derive(Debug, Getters)]
pub struct JsonFileCollection<R: Record> {
    /// File backing the collection
    path: PathBuf,
    #[getter(skip)]
    records: RwLock<BTreeMap<String, R>>,
}

impl<R: Record> JsonFileCollection<R> {
    /// Open (or create) the collection file in `dir`.
    ///
    /// A missing file is an empty collection; it is created on first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the existing
    /// file cannot be read or decoded.
    #[instrument(skip(dir), fields(collection = R::COLLECTION, dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            StoreError::new(StoreErrorKind::Io(format!("{}: {}", dir.display(), e)))
        })?;

        let path = dir.join(format!("{}.json", R::COLLECTION));
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let list: Vec<R> = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::new(StoreErrorKind::Serialization(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )))
                })?;
                list.into_iter()
                    .map(|r| (r.id().to_string(), r))
                    .collect::<BTreeMap<_, _>>()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::new(StoreErrorKind::Io(format!(
                    "{}: {}",
                    path.display(),
                    e
                ))));
            }
        };

        info!(path = %path.display(), count = records.len(), "Opened collection");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Serialize and atomically replace the collection file.
    async fn persist(&self, records: &BTreeMap<String, R>) -> StoreResult<()> {
        let list: Vec<&R> = records.values().collect();
        let contents = serde_json::to_vec_pretty(&list)
            .map_err(|e| StoreError::new(StoreErrorKind::Serialization(e.to_string())))?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, contents).await.map_err(|e| {
            StoreError::new(StoreErrorKind::Io(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            StoreError::new(StoreErrorKind::Io(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
        })?;

        debug!(path = %self.path.display(), count = records.len(), "Persisted collection");
        Ok(())
    }
}

#[async_trait::async_trait]
impl<R: Record> Collection<R> for JsonFileCollection<R> {
    #[instrument(skip(self, record), fields(collection = R::COLLECTION, id = record.id()))]
    async fn save(&self, record: &R) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        next.insert(record.id().to_string(), record.clone());
        self.persist(&next).await?;
        *records = next;
        Ok(())
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    async fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(id) {
            return Err(StoreError::not_found(R::COLLECTION, id));
        }
        let mut next = records.clone();
        next.remove(id);
        self.persist(&next).await?;
        *records = next;
        Ok(())
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
