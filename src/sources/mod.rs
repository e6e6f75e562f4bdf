//! Remote collaborators: the paged list source and the checkout mutation.
//!
//! The engine only talks to these through the traits below; transport details
//! (HTTP, GraphQL, retries, timeouts) belong to the implementations.

use futures::future::BoxFuture;

use crate::logic::CheckoutPayload;
use crate::state::{ListItem, Page, PageQuery};

mod http;

pub use http::{HttpCheckout, HttpListSource};

/// Boxed error returned by remote collaborators, propagated unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for collaborator calls.
pub type Result<T> = std::result::Result<T, BoxError>;

/// Successful checkout session creation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRedirect {
    /// Where the buyer continues the payment.
    pub redirect_url: String,
}

/// Source of list pages for one screen.
pub trait PagedListSource: Send + Sync {
    /// Row type produced by this source.
    type Item: ListItem + Send + 'static;

    /// What: Fetch one page for `query`.
    ///
    /// # Errors
    /// - Any transport or decoding failure of the implementation
    fn fetch_page(&self, query: PageQuery) -> BoxFuture<'_, Result<Page<Self::Item>>>;
}

/// Collaborator that turns a payload into a checkout session.
pub trait CheckoutCollaborator: Send + Sync {
    /// What: Submit `payload` and return where to redirect the buyer.
    ///
    /// # Errors
    /// - Any transport failure or rejection by the remote service
    fn submit(&self, payload: CheckoutPayload) -> BoxFuture<'_, Result<CheckoutRedirect>>;
}
