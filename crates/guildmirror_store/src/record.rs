//! Records that can live in a collection.

use guildmirror_core::{DirectoryGroup, NavigationNode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record addressed by a string primary key.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the collection the record belongs to.
    const COLLECTION: &'static str;

    /// Primary key.
    fn id(&self) -> &str;
}

impl Record for DirectoryGroup {
    const COLLECTION: &'static str = "Groups";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for NavigationNode {
    const COLLECTION: &'static str = "Nodes";

    fn id(&self) -> &str {
        &self.id
    }
}
