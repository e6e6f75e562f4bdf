use crate::logic::amount::format_amount;
use crate::logic::cache::PageCache;
use crate::state::{CurrencyTable, ItemId, ListItem};

/// One selected row with its user-editable amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Row identity.
    pub id: ItemId,
    /// Amount to pay as typed (or as seeded from the server default).
    pub editable_amount: String,
    /// Currency of the row's open balance.
    pub currency_code: String,
}

/// Edit-preserving materialized view of the selection.
///
/// Holds exactly one entry per selected, resolvable row with a non-zero open
/// balance, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// Entries in selection order.
    entries: Vec<SnapshotEntry>,
}

impl SelectionSnapshot {
    /// Build a snapshot from explicit entries.
    pub const fn from_entries(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    /// Entries in selection order.
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Entry for `id`, if present.
    pub fn get(&self, id: &ItemId) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// What: Replace the editable amount of one entry.
    ///
    /// Output:
    /// - `true` when an entry for `id` exists and was updated.
    ///
    /// Details:
    /// - Touches no other entry and never consults the cache, so a background
    ///   refresh cannot overwrite what the user typed.
    pub fn edit_field(&mut self, id: &ItemId, new_value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.editable_amount = new_value.into();
                true
            }
            None => false,
        }
    }
}

/// What: Derive the next snapshot from the current selection and cache.
///
/// Inputs:
/// - `selected_ids`: Checked ids in selection order.
/// - `cache`: Rows of the current filter context.
/// - `previous`: Snapshot before this change.
/// - `currencies`: Decimal places used to format seeded defaults.
///
/// Output:
/// - New snapshot ordered like `selected_ids`.
///
/// Details:
/// - Ids already in `previous` are carried forward verbatim, edits included.
/// - Newly selected ids are seeded from the cached open balance, formatted to
///   the currency's decimal places.
/// - Ids that are unresolved or have a zero open balance get no entry but stay
///   selected.
pub fn reconcile<T: ListItem>(
    selected_ids: &[ItemId],
    cache: &PageCache<T>,
    previous: &SelectionSnapshot,
    currencies: &CurrencyTable,
) -> SelectionSnapshot {
    let mut entries = Vec::with_capacity(selected_ids.len());
    for id in selected_ids {
        let Some(item) = cache.get(id) else {
            tracing::debug!(id = %id, "selected id not in cache; excluded from snapshot");
            continue;
        };
        let balance = item.open_balance();
        if balance.value.is_zero() {
            continue;
        }
        if let Some(kept) = previous.get(id) {
            entries.push(kept.clone());
            continue;
        }
        entries.push(SnapshotEntry {
            id: id.clone(),
            editable_amount: format_amount(balance.value, currencies.decimals_for(&balance.code)),
            currency_code: balance.code.clone(),
        });
    }
    SelectionSnapshot { entries }
}
