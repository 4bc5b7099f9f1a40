//! Event sinks used by the watcher.
//!
//! - [`StdoutSink`] writes one JSON envelope per line.
//! - [`WebhookSink`] POSTs each envelope to a URL.
//! - [`DedupeSink`] wraps another sink and drops events whose id was
//!   delivered recently.

use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use panelwatch_core::{Error, EventSink};
use panelwatch_proto::ChangeEvent;

/// Sink writing one JSON envelope per line to a writer.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

/// JSON lines on stdout.
pub type StdoutSink = JsonLinesSink<io::Stdout>;

impl StdoutSink {
    /// Create a sink writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a sink around a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    async fn emit(&self, event: &ChangeEvent) -> Result<(), Error> {
        let line = serde_json::to_string(&event.envelope())
            .map_err(|e| Error::Serialization(e.to_string()))?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line).map_err(|e| Error::Sink(e.to_string()))
    }

    async fn flush(&self) -> Result<(), Error> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| Error::Sink(e.to_string()))
    }
}

/// Sink POSTing each event envelope to a webhook URL.
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a webhook sink.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let url = url.into();
        if url.is_empty() {
            return Err(Error::Sink("webhook url must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("panelwatch/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Sink(e.to_string()))?;

        Ok(Self { http, url })
    }

    /// Get the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSink for WebhookSink {
    async fn emit(&self, event: &ChangeEvent) -> Result<(), Error> {
        let response = self
            .http
            .post(&self.url)
            .json(&event.envelope())
            .send()
            .await
            .map_err(|e| Error::Sink(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sink(format!(
                "webhook returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        debug!(id = %event.meta.id, status = status.as_u16(), "webhook delivered");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecentIds {
    set: HashSet<String>,
    order: VecDeque<String>,
}

/// Sink that suppresses events whose id is among the last `window` delivered.
///
/// Ids are only recorded after the inner sink accepts the event, so a failed
/// delivery is retried by the next run.
pub struct DedupeSink {
    inner: Arc<dyn EventSink>,
    window: usize,
    recent: Mutex<RecentIds>,
}

impl DedupeSink {
    /// Wrap a sink with a dedupe window.
    pub fn new(inner: Arc<dyn EventSink>, window: usize) -> Self {
        Self {
            inner,
            window,
            recent: Mutex::new(RecentIds::default()),
        }
    }

    /// Get the window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Check if an id was delivered recently.
    pub fn contains(&self, id: &str) -> bool {
        self.recent.lock().set.contains(id)
    }

    /// Number of ids currently remembered.
    pub fn len(&self) -> usize {
        self.recent.lock().order.len()
    }

    /// Check if no ids are remembered.
    pub fn is_empty(&self) -> bool {
        self.recent.lock().order.is_empty()
    }

    fn remember(&self, id: &str) {
        let mut recent = self.recent.lock();
        if !recent.set.insert(id.to_string()) {
            return;
        }
        recent.order.push_back(id.to_string());
        while recent.order.len() > self.window {
            if let Some(evicted) = recent.order.pop_front() {
                recent.set.remove(&evicted);
            }
        }
    }
}

#[async_trait]
impl EventSink for DedupeSink {
    async fn emit(&self, event: &ChangeEvent) -> Result<(), Error> {
        if self.window == 0 {
            return self.inner.emit(event).await;
        }
        if self.contains(&event.meta.id) {
            debug!(id = %event.meta.id, "suppressing duplicate event");
            return Ok(());
        }

        self.inner.emit(event).await?;
        self.remember(&event.meta.id);
        Ok(())
    }

    async fn flush(&self) -> Result<(), Error> {
        self.inner.flush().await
    }
}
