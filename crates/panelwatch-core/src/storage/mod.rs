//! Snapshot persistence.
//!
//! The detector reads one snapshot per webinar at the start of processing and
//! writes one replacement at the end. A sled-backed store is used in
//! production and an in-memory store in tests.

mod config;
mod engine;
mod memory;

pub use config::{StorageConfig, DEFAULT_DATA_PATH};
pub use engine::SledSnapshotStore;
pub use memory::MemorySnapshotStore;

use panelwatch_proto::{Snapshot, WebinarId};

use crate::error::Error;

/// Key-value store holding one snapshot per webinar.
///
/// A single writer is assumed; implementations only need read-your-writes
/// consistency.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot of a webinar, or `None` if it was never saved.
    fn load(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error>;

    /// Replace the snapshot of a webinar.
    fn save(&self, webinar_id: &WebinarId, snapshot: &Snapshot) -> Result<(), Error>;

    /// Remove the snapshot of a webinar, returning it if present.
    fn remove(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error>;

    /// Ids of all webinars with a stored snapshot.
    fn webinar_ids(&self) -> Result<Vec<WebinarId>, Error>;
}
