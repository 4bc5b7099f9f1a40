//! Webinar platform API client.
//!
//! This module provides the `Client` used to list webinars and their
//! panelists over the REST API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use panelwatch_core::WebinarSource;
use panelwatch_proto::{PanelistList, WebinarId, WebinarPage};

use crate::config::ClientConfig;
use crate::error::Error;

/// HTTP client for the webinar platform.
///
/// # Example
///
/// ```ignore
/// use panelwatch_client::{Client, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new(ClientConfig::default().with_token("..."))?;
///
///     let page = client.list_webinars(None).await?;
///     for webinar in &page.webinars {
///         let list = client.list_webinar_panelists(&webinar.id).await?;
///         println!("{}: {} panelists", webinar.id, list.panelists.len());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.base_url.is_empty() {
            return Err(Error::Config("base url must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("panelwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of webinars for the configured user.
    pub async fn list_webinars(&self, page_token: Option<&str>) -> Result<WebinarPage, Error> {
        let url = format!(
            "{}/users/{}/webinars",
            self.config.base_url, self.config.user_id
        );

        let mut query = vec![("page_size", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("next_page_token", token.to_string()));
        }

        self.get_json(&url, &query).await
    }

    /// Fetch the panelists of a webinar.
    pub async fn list_webinar_panelists(
        &self,
        webinar_id: &WebinarId,
    ) -> Result<PanelistList, Error> {
        let url = format!("{}/webinars/{}/panelists", self.config.base_url, webinar_id);
        self.get_json(&url, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let mut req = self.http.get(url).query(query);
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(url, "sending api request");
        let response = req.send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status, "api request failed");
            Err(Error::Api { status, body })
        }
    }
}

#[async_trait]
impl WebinarSource for Client {
    async fn list_webinars(
        &self,
        page_token: Option<&str>,
    ) -> Result<WebinarPage, panelwatch_core::Error> {
        Ok(Client::list_webinars(self, page_token).await?)
    }

    async fn list_webinar_panelists(
        &self,
        webinar_id: &WebinarId,
    ) -> Result<PanelistList, panelwatch_core::Error> {
        Ok(Client::list_webinar_panelists(self, webinar_id).await?)
    }
}
