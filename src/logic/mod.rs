//! Core non-UI logic split into modular submodules.

pub mod aggregate;
pub mod amount;
pub mod cache;
pub mod checkout;
pub mod query;
pub mod reconcile;
pub mod selection;

// Re-export public APIs to keep import paths short (crate::logic::...)
pub use aggregate::{Aggregate, compute};
pub use amount::{PLACEHOLDER_AMOUNT, format_amount, parse_amount, sanitize_amount_input};
pub use cache::{PageCache, RecordSummary};
pub use checkout::{CheckoutLineItem, CheckoutPayload, build, build_single};
pub use query::{Freshness, QueryController};
pub use reconcile::{SelectionSnapshot, SnapshotEntry, reconcile};
pub use selection::SelectionTracker;
