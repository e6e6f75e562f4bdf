//! Library entry for invoice-tray: the cache, selection and payment
//! aggregation engine behind paged, filterable invoice lists.
//!
//! One [`app::ListEngine`] instance serves one list screen. It accumulates
//! every page seen for the current filter context, keeps checked rows across
//! pagination and sorting, preserves typed payment amounts across refreshes,
//! and turns the selection into a checkout payload.

pub mod app;
pub mod error;
pub mod logging;
pub mod logic;
pub mod sources;
pub mod state;


pub use app::{ApplyOutcome, ListEngine};
pub use error::{EngineError, ItemRejection, ValidationError};
