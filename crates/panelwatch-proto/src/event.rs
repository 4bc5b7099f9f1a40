//! Change events emitted for panelist differences.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::panelist::Panelist;
use crate::webinar::WebinarId;

/// Payload key holding the event type.
pub const EVENT_TYPE_KEY: &str = "eventType";

/// Payload key holding the webinar id.
pub const WEBINAR_ID_KEY: &str = "webinarID";

/// Kind of panelist change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// The panelist appeared since the last snapshot.
    #[serde(rename = "panelist.added")]
    Added,
    /// The panelist disappeared since the last snapshot.
    #[serde(rename = "panelist.deleted")]
    Deleted,
    /// The panelist is still present but its record changed.
    #[serde(rename = "panelist.changed")]
    Changed,
}

impl EventType {
    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Added => "panelist.added",
            EventType::Deleted => "panelist.deleted",
            EventType::Changed => "panelist.changed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery metadata attached to every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Dedupe key: `<panelistID>-<eventType>`.
    pub id: String,
    /// Human readable one-liner.
    pub summary: String,
    /// Emission time in milliseconds since the Unix epoch.
    pub ts: i64,
}

impl EventMeta {
    /// Generate metadata for a panelist event, stamped with the current time.
    pub fn for_panelist(event_type: EventType, panelist: &Panelist) -> Self {
        Self::at(event_type, panelist, chrono::Utc::now().timestamp_millis())
    }

    /// Generate metadata with an explicit timestamp.
    pub fn at(event_type: EventType, panelist: &Panelist, ts: i64) -> Self {
        let email = panelist.email().unwrap_or_default();
        let summary = match panelist.name() {
            Some(name) => format!("{} - {} - {}", event_type, name, email),
            None => format!("{} - {}", event_type, email),
        };

        Self {
            id: format!("{}-{}", panelist.id(), event_type),
            summary,
            ts,
        }
    }
}

/// A single detected panelist change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Kind of change.
    pub event_type: EventType,
    /// Webinar the panelist belongs to.
    pub webinar_id: WebinarId,
    /// The current record, or the last known record for deletions.
    pub panelist: Panelist,
    /// Delivery metadata.
    pub meta: EventMeta,
}

impl ChangeEvent {
    /// Create an event with freshly generated metadata.
    pub fn new(event_type: EventType, webinar_id: WebinarId, panelist: Panelist) -> Self {
        let meta = EventMeta::for_panelist(event_type, &panelist);
        Self {
            event_type,
            webinar_id,
            panelist,
            meta,
        }
    }

    /// The flattened event body: `eventType`, then the panelist fields, then
    /// `webinarID`. Later keys overwrite earlier ones in place.
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            EVENT_TYPE_KEY.to_string(),
            Value::String(self.event_type.as_str().to_string()),
        );
        for (key, value) in self.panelist.fields() {
            body.insert(key.clone(), value.clone());
        }
        body.insert(
            WEBINAR_ID_KEY.to_string(),
            Value::String(self.webinar_id.to_string()),
        );
        Value::Object(body)
    }

    /// The payload wrapped with its delivery metadata.
    pub fn envelope(&self) -> Value {
        json!({
            "id": self.meta.id,
            "summary": self.meta.summary,
            "ts": self.meta.ts,
            "event": self.payload(),
        })
    }
}
