//! Value types and settings shared across the engine.
//!
//! Public API lives under `crate::state::*` via re-exports.

pub mod settings;
pub mod types;

// Public re-exports to keep import paths short
pub use settings::{CurrencyTable, EngineSettings, MixedCurrencyPolicy, SelectAllScope};
pub use types::{
    CheckState, ContextId, FetchRequest, FilterPatch, FilterSet, InvoiceItem, InvoiceStatus,
    ItemId, ListItem, Money, Page, PageInfo, PageQuery, PageResponse, RefreshOptions, RequestTag,
    SortDirection,
};
