//! Core value types shared by the list engine.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use rust_decimal::Decimal;

use crate::error::ItemRejection;

/// Stable identity of a list row.
///
/// Remote list sources hand out either numeric or string identifiers, so both
/// are accepted. Identity is by variant and value only; the payload of a row
/// never participates in equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric identifier (invoice entity id).
    Number(u64),
    /// Opaque string identifier.
    Text(String),
}

impl ItemId {
    /// What: Resolve the numeric entity id expected by the checkout mutation.
    ///
    /// Output:
    /// - `Some(n)` for numeric ids and for text ids that parse as an unsigned integer.
    pub fn as_entity_id(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Monetary amount tagged with its ISO currency code.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Money {
    /// Currency code (e.g., "USD").
    pub code: String,
    /// Exact decimal value.
    pub value: Decimal,
}

impl Money {
    /// Build a `Money` value from a code and a decimal.
    pub fn new(code: impl Into<String>, value: Decimal) -> Self {
        Self {
            code: code.into(),
            value,
        }
    }
}

/// Row shape the engine needs from any paged list.
///
/// Screens supply their own row types; the engine only relies on identity,
/// the server-sourced default amount and selectability.
pub trait ListItem: Clone + fmt::Debug {
    /// Stable identity of the row.
    fn id(&self) -> &ItemId;

    /// Server-sourced balance used to seed the editable amount.
    fn open_balance(&self) -> &Money;

    /// Whether bulk selection may include this row.
    fn is_selectable(&self) -> bool {
        !self.open_balance().value.is_zero()
    }

    /// What: Check the row before it enters the page cache.
    ///
    /// # Errors
    /// - `ItemRejection::MissingCurrency` when the balance has no currency code
    /// - `ItemRejection::NegativeBalance` when the open balance is below zero
    fn validate(&self) -> Result<(), ItemRejection> {
        let balance = self.open_balance();
        if balance.code.trim().is_empty() {
            return Err(ItemRejection::MissingCurrency {
                id: self.id().clone(),
            });
        }
        if balance.value.is_sign_negative() && !balance.value.is_zero() {
            return Err(ItemRejection::NegativeBalance {
                id: self.id().clone(),
                value: balance.value,
            });
        }
        Ok(())
    }
}

/// Payment status of an invoice as reported by the storefront API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Nothing paid yet.
    #[default]
    Open,
    /// Some amount paid, balance remaining.
    PartiallyPaid,
    /// Fully paid.
    Paid,
    /// Past due date with balance remaining.
    Overdue,
}

/// Invoice row as returned by the invoice list query.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Invoice entity id.
    pub id: ItemId,
    /// Human-facing invoice number.
    #[serde(default)]
    pub invoice_number: String,
    /// Owning company.
    #[serde(default)]
    pub company_id: Option<u64>,
    /// Payment status.
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Remaining balance; seeds the amount to pay.
    pub open_balance: Money,
    /// Balance when the invoice was issued.
    pub original_balance: Money,
    /// Due date, display formatted by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Server-side flag that locks the row checkbox.
    #[serde(default)]
    pub disable_current_checkbox: bool,
}

impl ListItem for InvoiceItem {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn open_balance(&self) -> &Money {
        &self.open_balance
    }

    fn is_selectable(&self) -> bool {
        !self.disable_current_checkbox
            && self.status != InvoiceStatus::Paid
            && !self.open_balance.value.is_zero()
    }
}

/// One page returned by a paged list source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows of the page in server order.
    pub items: Vec<T>,
    /// Total number of rows matching the filters across all pages.
    pub total_count: usize,
}

/// Sort direction for the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a direction from its query-string spelling (case-insensitive).
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Active non-pagination filters, ordered by key.
pub type FilterSet = BTreeMap<String, String>;

/// Partial filter update; `None` removes the key.
pub type FilterPatch = BTreeMap<String, Option<String>>;

/// What: Hash a filter set into a fingerprint.
///
/// Details:
/// - Pagination offsets and sort settings are not part of `FilterSet`, so they
///   never influence the fingerprint.
/// - `BTreeMap` iteration order makes the hash independent of insertion order.
pub fn filter_fingerprint(filters: &FilterSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    hasher.finish()
}

/// Query handed to the paged list source.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Filter fields.
    pub filters: FilterSet,
    /// Sort column, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Offset of the first row.
    pub offset: usize,
    /// Page size.
    pub limit: usize,
}

/// Identity of a filter context.
///
/// The generation increases on every filter change, so returning to an
/// earlier filter set still yields a distinct context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContextId {
    /// Monotonic filter-change counter.
    pub generation: u64,
    /// Hash of the filter fields.
    pub fingerprint: u64,
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}-{:016x}", self.generation, self.fingerprint)
    }
}

/// Tag attached to every outstanding page request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RequestTag {
    /// Filter context at dispatch time.
    pub context: ContextId,
    /// Monotonic request identifier.
    pub request_id: u64,
}

/// Refetch event emitted by the filter/sort controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Correlation tag echoed back in the response.
    pub tag: RequestTag,
    /// Query to run.
    pub query: PageQuery,
    /// Whether the refresh keeps the current selection.
    pub keep_checked_items: bool,
}

/// Outcome of a page request, correlated by tag.
#[derive(Debug)]
pub struct PageResponse<T> {
    /// Tag of the originating request.
    pub tag: RequestTag,
    /// Page or the collaborator's failure.
    pub result: Result<Page<T>, crate::sources::BoxError>,
}

/// Options for a manual refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Keep the current selection and its edits.
    pub keep_checked_items: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            keep_checked_items: true,
        }
    }
}

/// Pagination view for the rendering layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Offset of the current page.
    pub offset: usize,
    /// Page size.
    pub limit: usize,
    /// Total matching rows reported by the last current response.
    pub total_count: usize,
}

impl PageInfo {
    /// Zero-based index of the current page.
    pub const fn page_index(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.offset / self.limit
        }
    }

    /// Number of pages needed for `total_count` rows.
    pub const fn page_count(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.total_count.div_ceil(self.limit)
        }
    }

    /// Whether another page follows the current one.
    pub const fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_count
    }
}

/// Tri-state of the table header checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckState {
    /// No selectable row is checked.
    Unchecked,
    /// Some but not all selectable rows are checked.
    Partial,
    /// Every selectable row is checked.
    Checked,
}
