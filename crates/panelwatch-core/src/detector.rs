//! Panelist change detector.
//!
//! Processes webinars one at a time: fetch the current panelists, load the
//! stored snapshot, emit one event per difference, then replace the snapshot.
//! Any error aborts the run; snapshots already written for earlier webinars
//! are kept and the remaining webinars are picked up on the next run.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use panelwatch_proto::{EventType, WebinarId};

use crate::diff::SnapshotDiff;
use crate::error::Error;
use crate::fingerprint::FingerprintMode;
use crate::sink::EventSink;
use crate::source::{discover_webinars, WebinarSource};
use crate::storage::SnapshotStore;

/// Detector configuration.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    /// Webinars to watch. Empty means every webinar the source lists.
    pub webinars: Vec<WebinarId>,

    /// How panelist records are fingerprinted.
    pub fingerprint: FingerprintMode,
}

impl DetectorConfig {
    /// Create a configuration that watches every webinar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch an explicit list of webinars.
    pub fn with_webinars<I, T>(mut self, webinars: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WebinarId>,
    {
        self.webinars = webinars.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fingerprint mode.
    pub fn with_fingerprint(mut self, mode: FingerprintMode) -> Self {
        self.fingerprint = mode;
        self
    }

    /// Check if webinars are discovered from the source.
    pub fn discovers_webinars(&self) -> bool {
        self.webinars.is_empty()
    }
}

/// Outcome of processing one webinar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebinarReport {
    /// Webinar id.
    pub webinar_id: WebinarId,
    /// Number of `panelist.added` events emitted.
    pub added: usize,
    /// Number of `panelist.deleted` events emitted.
    pub deleted: usize,
    /// Number of `panelist.changed` events emitted.
    pub changed: usize,
    /// Panelists in the new snapshot.
    pub total_panelists: usize,
}

impl WebinarReport {
    /// Events emitted for this webinar.
    pub fn events(&self) -> usize {
        self.added + self.deleted + self.changed
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Per-webinar results in processing order.
    pub webinars: Vec<WebinarReport>,
}

impl RunReport {
    /// Total events emitted across all webinars.
    pub fn total_events(&self) -> usize {
        self.webinars.iter().map(WebinarReport::events).sum()
    }

    /// Check if the run emitted nothing.
    pub fn is_empty(&self) -> bool {
        self.total_events() == 0
    }
}

/// Detects panelist changes and emits them to a sink.
pub struct PanelistChangeDetector {
    source: Arc<dyn WebinarSource>,
    store: Arc<dyn SnapshotStore>,
    sink: Arc<dyn EventSink>,
    config: DetectorConfig,
}

impl PanelistChangeDetector {
    /// Create a detector from its collaborators.
    pub fn new(
        source: Arc<dyn WebinarSource>,
        store: Arc<dyn SnapshotStore>,
        sink: Arc<dyn EventSink>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            source,
            store,
            sink,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Resolve the webinars to process this run.
    pub async fn target_webinars(&self) -> Result<Vec<WebinarId>, Error> {
        if self.config.discovers_webinars() {
            discover_webinars(self.source.as_ref()).await
        } else {
            Ok(self.config.webinars.clone())
        }
    }

    /// Process every target webinar in order.
    pub async fn run(&self) -> Result<RunReport, Error> {
        let started = Instant::now();
        let webinars = self.target_webinars().await?;

        info!(
            webinars = webinars.len(),
            discovered = self.config.discovers_webinars(),
            "starting panelist check"
        );

        let mut report = RunReport::default();
        for webinar_id in &webinars {
            report.webinars.push(self.process_webinar(webinar_id).await?);
        }

        self.sink.flush().await?;

        info!(
            webinars = report.webinars.len(),
            events = report.total_events(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "panelist check complete"
        );

        Ok(report)
    }

    /// Fetch, diff, emit and persist a single webinar.
    pub async fn process_webinar(&self, webinar_id: &WebinarId) -> Result<WebinarReport, Error> {
        let current = self.source.list_webinar_panelists(webinar_id).await?;
        let previous = self.store.load(webinar_id)?.unwrap_or_default();

        let diff = SnapshotDiff::compute(&previous, &current.panelists, self.config.fingerprint)?;

        debug!(
            webinar = %webinar_id,
            old_ids = ?previous.ids().collect::<Vec<_>>(),
            new_ids = ?diff.snapshot.ids().collect::<Vec<_>>(),
            deleted = ?diff.ids(EventType::Deleted),
            added = ?diff.ids(EventType::Added),
            changed = ?diff.ids(EventType::Changed),
            "computed panelist diff"
        );

        for event in diff.events(webinar_id) {
            debug!(
                webinar = %webinar_id,
                id = %event.meta.id,
                summary = %event.meta.summary,
                "emitting event"
            );
            self.sink.emit(&event).await?;
        }

        self.store.save(webinar_id, &diff.snapshot)?;

        let report = WebinarReport {
            webinar_id: webinar_id.clone(),
            added: diff.count(EventType::Added),
            deleted: diff.count(EventType::Deleted),
            changed: diff.count(EventType::Changed),
            total_panelists: diff.snapshot.len(),
        };

        info!(
            webinar = %webinar_id,
            added = report.added,
            deleted = report.deleted,
            changed = report.changed,
            panelists = report.total_panelists,
            "webinar processed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_discovers() {
        let config = DetectorConfig::new();
        assert!(config.discovers_webinars());
        assert_eq!(config.fingerprint, FingerprintMode::Ordered);
    }

    #[test]
    fn test_config_builder() {
        let config = DetectorConfig::new()
            .with_webinars(["1", "2"])
            .with_fingerprint(FingerprintMode::Canonical);

        assert!(!config.discovers_webinars());
        assert_eq!(config.webinars, vec![WebinarId::from("1"), WebinarId::from("2")]);
        assert_eq!(config.fingerprint, FingerprintMode::Canonical);
    }

    #[test]
    fn test_report_totals() {
        let report = RunReport {
            webinars: vec![
                WebinarReport {
                    webinar_id: WebinarId::from("1"),
                    added: 2,
                    deleted: 1,
                    changed: 0,
                    total_panelists: 3,
                },
                WebinarReport {
                    webinar_id: WebinarId::from("2"),
                    added: 0,
                    deleted: 0,
                    changed: 1,
                    total_panelists: 1,
                },
            ],
        };

        assert_eq!(report.total_events(), 4);
        assert!(!report.is_empty());
        assert!(RunReport::default().is_empty());
    }
}
