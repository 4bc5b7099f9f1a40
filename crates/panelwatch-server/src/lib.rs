//! panelwatch server - polling service for webinar panelist changes.
//!
//! This crate wires the API client, the snapshot store and an event sink
//! into a [`panelwatch_core::PanelistChangeDetector`] and runs it on a fixed
//! interval.

pub mod config;
pub mod error;
pub mod poller;
pub mod service;
pub mod sink;

pub use config::{Args, SinkConfig, SinkKind, WatcherConfig};
pub use error::Error;
pub use poller::{PollStats, Poller};
pub use service::{build_detector, build_sink, build_store};
pub use sink::{DedupeSink, JsonLinesSink, StdoutSink, WebhookSink};
