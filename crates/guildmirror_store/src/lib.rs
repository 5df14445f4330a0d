//! Entity store for guildmirror.
//!
//! Durable key-value persistence for the two mirrored record kinds:
//! directory groups ("Groups") and navigation nodes ("Nodes"). Each record
//! is addressed by its primary `id`; there are no secondary indexes, so
//! lookups by any other field scan the collection.
//!
//! # Backends
//!
//! - [`MemoryCollection`] - process-local, for tests and dry runs
//! - [`JsonFileCollection`] - one pretty-printed JSON file per collection,
//!   written through on every change (temp file + rename)
//!
//! Both guard their records with a read/write lock so reads never observe
//! a half-applied save.
//!
//! # Example
//!
//! ```rust,ignore
//! use guildmirror_store::EntityStore;
//!
//! let store = EntityStore::open("./guildmirror-data").await?;
//! let groups = store.groups();
//! if !groups.is_registered("1001").await {
//!     // first observation of the guild
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod entity_store;
mod json_file;
mod memory;
mod record;
mod repository;

pub use collection::Collection;
pub use entity_store::EntityStore;
pub use json_file::JsonFileCollection;
pub use memory::MemoryCollection;
pub use record::Record;
pub use repository::{GroupRepository, NodeRepository};
