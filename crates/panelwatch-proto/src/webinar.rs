//! Webinar identifiers and API page types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::panelist::Panelist;

/// Identifier of a webinar.
///
/// The upstream API returns numeric ids; they are kept as decimal strings so
/// they can be used directly as storage keys and URL segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WebinarId(String);

impl WebinarId {
    /// Create a webinar id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as bytes, used as a storage key.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for WebinarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WebinarId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WebinarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for WebinarId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for WebinarId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(id) => WebinarId::from(id),
            RawId::Text(id) => WebinarId(id),
        })
    }
}

/// A webinar as listed by the API. Only the fields used here are decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webinar {
    /// Webinar id.
    pub id: WebinarId,
    /// Webinar topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Scheduled start time as returned upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl Webinar {
    /// Create a webinar entry with only an id.
    pub fn new(id: impl Into<WebinarId>) -> Self {
        Self {
            id: id.into(),
            topic: None,
            start_time: None,
        }
    }

    /// Set the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// One page of the webinar listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebinarPage {
    /// Webinars on this page.
    #[serde(default)]
    pub webinars: Vec<Webinar>,
    /// Cursor for the next page. Empty or absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Total number of webinars across all pages, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
}

impl WebinarPage {
    /// Create a page.
    pub fn new(webinars: Vec<Webinar>, next_page_token: Option<String>) -> Self {
        Self {
            webinars,
            next_page_token,
            total_records: None,
        }
    }

    /// The cursor for the following page, if there is one.
    pub fn next_token(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// The panelist listing of a single webinar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelistList {
    /// Current panelists.
    #[serde(default)]
    pub panelists: Vec<Panelist>,
    /// Number of panelists, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
}

impl PanelistList {
    /// Create a listing.
    pub fn new(panelists: Vec<Panelist>) -> Self {
        Self {
            total_records: Some(panelists.len() as u64),
            panelists,
        }
    }
}
