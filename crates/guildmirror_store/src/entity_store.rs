//! The two collections of the mirror, opened together.

use crate::{GroupRepository, JsonFileCollection, MemoryCollection, NodeRepository};
use guildmirror_core::{DirectoryGroup, NavigationNode};
use guildmirror_error::StoreResult;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// Groups and nodes, backed by the same kind of collection.
#[derive(Clone)]
pub struct EntityStore {
    groups: GroupRepository,
    nodes: NodeRepository,
}

impl EntityStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::from_collections(
            Arc::new(MemoryCollection::<DirectoryGroup>::new()),
            Arc::new(MemoryCollection::<NavigationNode>::new()),
        )
    }

    /// Open the JSON-file store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either collection file exists but cannot be read.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let groups = JsonFileCollection::<DirectoryGroup>::open(dir.as_ref()).await?;
        let nodes = JsonFileCollection::<NavigationNode>::open(dir.as_ref()).await?;
        Ok(Self::from_collections(Arc::new(groups), Arc::new(nodes)))
    }

    /// Build a store from arbitrary collection backends.
    pub fn from_collections(
        groups: Arc<dyn crate::Collection<DirectoryGroup>>,
        nodes: Arc<dyn crate::Collection<NavigationNode>>,
    ) -> Self {
        Self {
            groups: GroupRepository::new(groups),
            nodes: NodeRepository::new(nodes),
        }
    }

    /// Directory groups.
    pub fn groups(&self) -> &GroupRepository {
        &self.groups
    }

    /// Navigation nodes.
    pub fn nodes(&self) -> &NodeRepository {
        &self.nodes
    }
}
