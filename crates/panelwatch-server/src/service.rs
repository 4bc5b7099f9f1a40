//! Wiring of the detector from a [`WatcherConfig`].

use std::sync::Arc;

use tracing::info;

use panelwatch_client::Client;
use panelwatch_core::{
    EventSink, MemorySnapshotStore, PanelistChangeDetector, SledSnapshotStore, SnapshotStore,
};

use crate::config::{SinkConfig, WatcherConfig};
use crate::error::Error;
use crate::sink::{DedupeSink, StdoutSink, WebhookSink};

/// Open the snapshot store described by the configuration.
pub fn build_store(config: &WatcherConfig) -> Result<Arc<dyn SnapshotStore>, Error> {
    match &config.storage {
        Some(storage) => {
            let store = SledSnapshotStore::open(storage.clone())?;
            info!(
                path = %storage.path.display(),
                snapshots = store.len(),
                recovered = store.was_recovered(),
                "snapshot store opened"
            );
            Ok(Arc::new(store))
        }
        None => {
            info!("using in-memory snapshot store");
            Ok(Arc::new(MemorySnapshotStore::new()))
        }
    }
}

/// Build the event sink, wrapped in a dedupe window when enabled.
pub fn build_sink(config: &WatcherConfig) -> Result<Arc<dyn EventSink>, Error> {
    let sink: Arc<dyn EventSink> = match &config.sink {
        SinkConfig::Stdout => Arc::new(StdoutSink::stdout()),
        SinkConfig::Webhook { url } => Arc::new(WebhookSink::new(url, config.client.timeout)?),
    };

    if config.has_dedupe() {
        Ok(Arc::new(DedupeSink::new(sink, config.dedupe_window)))
    } else {
        Ok(sink)
    }
}

/// Build a detector against the live API.
pub fn build_detector(config: &WatcherConfig) -> Result<PanelistChangeDetector, Error> {
    if config.client.token.is_none() {
        return Err(Error::Config(
            "an API token is required (--token or PANELWATCH_API_TOKEN)".to_string(),
        ));
    }

    let client = Client::new(config.client.clone())?;
    let store = build_store(config)?;
    let sink = build_sink(config)?;

    Ok(PanelistChangeDetector::new(
        Arc::new(client),
        store,
        sink,
        config.detector.clone(),
    ))
}
