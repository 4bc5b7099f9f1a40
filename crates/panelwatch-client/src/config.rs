//! Client configuration.

use std::time::Duration;

/// Default base URL of the webinar platform REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.zoom.us/v2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default and maximum page size for webinar listing.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

/// User whose webinars are listed during discovery.
pub const DEFAULT_USER_ID: &str = "me";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,

    /// OAuth bearer token.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// Page size for webinar listing.
    pub page_size: u32,

    /// User whose webinars are listed.
    pub user_id: String,
}

impl ClientConfig {
    /// Create a new client configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the listing page size, clamped to 1..=300.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Set the user whose webinars are listed.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
