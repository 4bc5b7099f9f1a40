//! Sled-backed snapshot store.

use sled::{Db, Tree};

use panelwatch_proto::{Snapshot, WebinarId};

use super::{SnapshotStore, StorageConfig};
use crate::error::Error;

/// Tree name for webinar snapshots.
const SNAPSHOT_TREE: &str = "snapshots";

/// Snapshot store persisting one JSON value per webinar in sled.
pub struct SledSnapshotStore {
    /// The underlying sled database.
    db: Db,

    /// Tree for snapshots (webinar id -> snapshot JSON).
    snapshots: Tree,

    /// Flush after every write instead of relying on the background flusher.
    flush_on_write: bool,
}

impl SledSnapshotStore {
    /// Open or create a snapshot store with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let snapshots = db.open_tree(SNAPSHOT_TREE)?;

        tracing::debug!(
            path = %config.path.display(),
            temporary = config.temporary,
            recovered = db.was_recovered(),
            "snapshot store opened"
        );

        Ok(Self {
            db,
            snapshots,
            flush_on_write: config.flush_every_ms.is_none(),
        })
    }

    /// Check if the database was recovered from a previous run.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.snapshots.flush()?;
        Ok(())
    }
}

impl SnapshotStore for SledSnapshotStore {
    fn load(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error> {
        match self.snapshots.get(webinar_id.as_bytes())? {
            Some(bytes) => Ok(Some(Snapshot::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, webinar_id: &WebinarId, snapshot: &Snapshot) -> Result<(), Error> {
        let bytes = snapshot.to_bytes()?;
        self.snapshots.insert(webinar_id.as_bytes(), bytes)?;

        if self.flush_on_write {
            self.snapshots.flush()?;
        }

        Ok(())
    }

    fn remove(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error> {
        match self.snapshots.remove(webinar_id.as_bytes())? {
            Some(bytes) => Ok(Some(Snapshot::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn webinar_ids(&self) -> Result<Vec<WebinarId>, Error> {
        let mut ids = Vec::new();
        for key in self.snapshots.iter().keys() {
            let key = key?;
            let id = std::str::from_utf8(&key)
                .map_err(|e| Error::Serialization(format!("invalid webinar key: {}", e)))?;
            ids.push(WebinarId::from(id));
        }
        Ok(ids)
    }
}
