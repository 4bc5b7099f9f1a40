//! panelwatch core - snapshot diffing and panelist change detection.
//!
//! This crate holds the change detection logic and the interfaces of the
//! collaborators it depends on: a [`WebinarSource`] for the upstream API, a
//! [`SnapshotStore`] for per-webinar snapshots and an [`EventSink`] for the
//! emitted events.

pub mod detector;
pub mod diff;
pub mod error;
pub mod fingerprint;
pub mod sink;
pub mod source;
pub mod storage;

pub use detector::{DetectorConfig, PanelistChangeDetector, RunReport, WebinarReport};
pub use diff::{PanelistChange, SnapshotDiff};
pub use error::Error;
pub use fingerprint::{fingerprint, FingerprintMode};
pub use sink::{EventSink, MemorySink};
pub use source::{discover_webinars, WebinarSource};
pub use storage::{MemorySnapshotStore, SledSnapshotStore, SnapshotStore, StorageConfig};

/// Re-export protocol types.
pub use panelwatch_proto as proto;
