//! Event sink abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use panelwatch_proto::ChangeEvent;

use crate::error::Error;

/// Destination for change events.
///
/// Consumers are expected to deduplicate on `event.meta.id`.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    async fn emit(&self, event: &ChangeEvent) -> Result<(), Error>;

    /// Flush buffered output, if any.
    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Sink that records events in memory (for testing).
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl MemorySink {
    /// Create a new memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }

    /// Take and clear the recorded events.
    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Get event count.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn emit(&self, event: &ChangeEvent) -> Result<(), Error> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelwatch_proto::{EventType, Panelist, WebinarId};

    #[tokio::test]
    async fn test_memory_sink() {
        let sink = MemorySink::new();
        let event = ChangeEvent::new(
            EventType::Added,
            WebinarId::from("w"),
            Panelist::new("1", "a@x.com"),
        );

        sink.emit(&event).await.unwrap();
        sink.flush().await.unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0], event);

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }
}
