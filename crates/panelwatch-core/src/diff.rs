//! Snapshot diffing algorithm.
//!
//! Compares the stored snapshot of a webinar against the current panelist
//! list and produces the ordered list of changes plus the replacement
//! snapshot.

use std::collections::HashSet;

use panelwatch_proto::{ChangeEvent, EventType, Panelist, Snapshot, WebinarId};

use crate::error::Error;
use crate::fingerprint::{fingerprint, FingerprintMode};

/// A single panelist difference.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelistChange {
    /// Kind of change.
    pub event_type: EventType,
    /// Record to report: the stored one for deletions, the current one otherwise.
    pub panelist: Panelist,
}

/// Complete diff between a stored snapshot and the current panelist list.
#[derive(Debug, Clone)]
pub struct SnapshotDiff {
    /// Changes in emission order: deletions first (by id), then additions
    /// and modifications in the order of the current list.
    pub changes: Vec<PanelistChange>,
    /// The snapshot to persist once the changes are emitted.
    pub snapshot: Snapshot,
}

impl SnapshotDiff {
    /// Compute the diff between a stored snapshot and the current list.
    pub fn compute(
        previous: &Snapshot,
        current: &[Panelist],
        mode: FingerprintMode,
    ) -> Result<Self, Error> {
        let snapshot = Snapshot::from_panelists(current);

        let old_ids: HashSet<&str> = previous.ids().collect();

        let mut changes = Vec::new();

        // Deleted panelists, reported with their last known record
        for (id, panelist) in previous.iter() {
            if !snapshot.contains(id) {
                changes.push(PanelistChange {
                    event_type: EventType::Deleted,
                    panelist: panelist.clone(),
                });
            }
        }

        // Added and modified panelists, in list order. A duplicated id yields
        // one change: additions carry the first occurrence, modifications
        // compare the last occurrence (the one stored) against the snapshot.
        let mut seen = HashSet::new();
        for panelist in current {
            let id = panelist.id();
            if !seen.insert(id) {
                continue;
            }

            if !old_ids.contains(id) {
                changes.push(PanelistChange {
                    event_type: EventType::Added,
                    panelist: panelist.clone(),
                });
                continue;
            }

            let latest = match snapshot.get(id) {
                Some(latest) => latest,
                None => continue,
            };
            if let Some(stored) = previous.get(id) {
                if fingerprint(latest, mode)? != fingerprint(stored, mode)? {
                    changes.push(PanelistChange {
                        event_type: EventType::Changed,
                        panelist: latest.clone(),
                    });
                }
            }
        }

        Ok(SnapshotDiff { changes, snapshot })
    }

    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total number of changes.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Number of changes of one kind.
    pub fn count(&self, event_type: EventType) -> usize {
        self.changes
            .iter()
            .filter(|c| c.event_type == event_type)
            .count()
    }

    /// Ids of the panelists affected by one kind of change.
    pub fn ids(&self, event_type: EventType) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.event_type == event_type)
            .map(|c| c.panelist.id())
            .collect()
    }

    /// Turn the changes into events for a webinar.
    pub fn events(&self, webinar_id: &WebinarId) -> Vec<ChangeEvent> {
        self.changes
            .iter()
            .map(|c| ChangeEvent::new(c.event_type, webinar_id.clone(), c.panelist.clone()))
            .collect()
    }
}
