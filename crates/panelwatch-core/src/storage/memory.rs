//! In-memory snapshot store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use panelwatch_proto::{Snapshot, WebinarId};

use super::SnapshotStore;
use crate::error::Error;

/// Snapshot store kept in process memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<WebinarId, Snapshot>>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Check if no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error> {
        Ok(self.snapshots.read().get(webinar_id).cloned())
    }

    fn save(&self, webinar_id: &WebinarId, snapshot: &Snapshot) -> Result<(), Error> {
        self.snapshots
            .write()
            .insert(webinar_id.clone(), snapshot.clone());
        Ok(())
    }

    fn remove(&self, webinar_id: &WebinarId) -> Result<Option<Snapshot>, Error> {
        Ok(self.snapshots.write().remove(webinar_id))
    }

    fn webinar_ids(&self) -> Result<Vec<WebinarId>, Error> {
        let mut ids: Vec<_> = self.snapshots.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelwatch_proto::Panelist;

    #[test]
    fn test_memory_store() {
        let store = MemorySnapshotStore::new();
        let id = WebinarId::from("w");
        let snapshot: Snapshot = vec![Panelist::new("1", "a@x.com")].into_iter().collect();

        assert!(store.load(&id).unwrap().is_none());
        store.save(&id, &snapshot).unwrap();
        assert_eq!(store.load(&id).unwrap(), Some(snapshot.clone()));
        assert_eq!(store.webinar_ids().unwrap(), vec![id.clone()]);

        assert_eq!(store.remove(&id).unwrap(), Some(snapshot));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemorySnapshotStore::new();
        let other = store.clone();

        store.save(&WebinarId::from("w"), &Snapshot::new()).unwrap();
        assert_eq!(other.len(), 1);
    }
}
