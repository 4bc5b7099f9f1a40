//! Webinar API abstraction.

use async_trait::async_trait;

use panelwatch_proto::{PanelistList, WebinarId, WebinarPage};

use crate::error::Error;

/// Read access to the webinar platform.
///
/// Implementations map transport failures to [`Error::Source`].
#[async_trait]
pub trait WebinarSource: Send + Sync {
    /// Fetch one page of webinars. `page_token` is `None` for the first page.
    async fn list_webinars(&self, page_token: Option<&str>) -> Result<WebinarPage, Error>;

    /// Fetch the current panelists of a webinar.
    async fn list_webinar_panelists(&self, webinar_id: &WebinarId) -> Result<PanelistList, Error>;
}

/// Collect the ids of every webinar by following page tokens until the last
/// page.
pub async fn discover_webinars(source: &dyn WebinarSource) -> Result<Vec<WebinarId>, Error> {
    let mut ids = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.list_webinars(token.as_deref()).await?;
        pages += 1;
        ids.extend(page.webinars.iter().map(|w| w.id.clone()));

        match page.next_token() {
            Some(next) => token = Some(next.to_string()),
            None => break,
        }
    }

    tracing::debug!(pages, webinars = ids.len(), "webinar discovery complete");
    Ok(ids)
}
