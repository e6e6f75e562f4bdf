//! JSON-over-HTTP implementations of the remote collaborators.
use std::marker::PhantomData;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{CheckoutCollaborator, CheckoutRedirect, PagedListSource, Result};
use crate::logic::CheckoutPayload;
use crate::state::{EngineSettings, ListItem, Page, PageQuery};

/// What: Build a client with the configured timeout.
///
/// Details:
/// - Falls back to a default client if the builder fails.
fn build_client(settings: &EngineSettings) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Paged list source that POSTs the [`PageQuery`] as JSON.
///
/// The endpoint must answer with `{ "items": [...], "totalCount": n }`.
#[derive(Clone, Debug)]
pub struct HttpListSource<T> {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// List endpoint URL.
    endpoint: String,
    /// Row type marker.
    rows: PhantomData<fn() -> T>,
}

impl<T> HttpListSource<T> {
    /// Create a source for `endpoint` using the timeout from `settings`.
    pub fn new(endpoint: impl Into<String>, settings: &EngineSettings) -> Self {
        Self {
            client: build_client(settings),
            endpoint: endpoint.into(),
            rows: PhantomData,
        }
    }

    /// Endpoint URL this source posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<T> PagedListSource for HttpListSource<T>
where
    T: ListItem + DeserializeOwned + Send + 'static,
{
    type Item = T;

    fn fetch_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Page<T>>> {
        Box::pin(async move {
            let resp = self.client.post(self.endpoint.as_str()).json(&query).send().await?;
            let status = resp.status();
            if !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    endpoint = %self.endpoint,
                    "list source returned non-success status"
                );
                return Err(format!("list source status {status}").into());
            }
            let page: Page<T> = resp.json().await?;
            debug!(
                rows = page.items.len(),
                total = page.total_count,
                offset = query.offset,
                "fetched list page"
            );
            Ok(page)
        })
    }
}

/// Checkout collaborator that POSTs the [`CheckoutPayload`] as JSON.
///
/// The endpoint must answer with `{ "redirectUrl": "..." }`.
#[derive(Clone, Debug)]
pub struct HttpCheckout {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Checkout endpoint URL.
    endpoint: String,
}

impl HttpCheckout {
    /// Create a collaborator for `endpoint` using the timeout from `settings`.
    pub fn new(endpoint: impl Into<String>, settings: &EngineSettings) -> Self {
        Self {
            client: build_client(settings),
            endpoint: endpoint.into(),
        }
    }
}

impl CheckoutCollaborator for HttpCheckout {
    fn submit(&self, payload: CheckoutPayload) -> BoxFuture<'_, Result<CheckoutRedirect>> {
        Box::pin(async move {
            let resp = self.client.post(self.endpoint.as_str()).json(&payload).send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let preview: String = body.chars().take(300).collect();
                warn!(
                    status = status.as_u16(),
                    preview = preview,
                    "checkout returned non-success status"
                );
                return Err(format!("checkout status {status}").into());
            }
            let redirect: CheckoutRedirect = resp.json().await?;
            Ok(redirect)
        })
    }
}
