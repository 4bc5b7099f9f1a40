//! Per-webinar panelist snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::panelist::Panelist;

/// The last observed panelist set of a webinar, keyed by panelist id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    panelists: BTreeMap<String, Panelist>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a panelist list.
    ///
    /// When the list repeats an id, the last record wins.
    pub fn from_panelists<'a>(panelists: impl IntoIterator<Item = &'a Panelist>) -> Self {
        let panelists = panelists
            .into_iter()
            .map(|p| (p.id().to_string(), p.clone()))
            .collect();
        Self { panelists }
    }

    /// Get a panelist by id.
    pub fn get(&self, id: &str) -> Option<&Panelist> {
        self.panelists.get(id)
    }

    /// Check whether a panelist id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.panelists.contains_key(id)
    }

    /// Insert or replace a panelist, returning the previous record.
    pub fn insert(&mut self, panelist: Panelist) -> Option<Panelist> {
        self.panelists.insert(panelist.id().to_string(), panelist)
    }

    /// Remove a panelist by id.
    pub fn remove(&mut self, id: &str) -> Option<Panelist> {
        self.panelists.remove(id)
    }

    /// Panelist ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.panelists.keys().map(String::as_str)
    }

    /// Iterate over the stored panelists.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Panelist)> {
        self.panelists.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Number of panelists.
    pub fn len(&self) -> usize {
        self.panelists.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.panelists.is_empty()
    }

    /// Encode as JSON bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Decode from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

impl FromIterator<Panelist> for Snapshot {
    fn from_iter<T: IntoIterator<Item = Panelist>>(iter: T) -> Self {
        let panelists = iter
            .into_iter()
            .map(|p| (p.id().to_string(), p))
            .collect();
        Self { panelists }
    }
}
