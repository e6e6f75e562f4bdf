use indexmap::IndexMap;

use crate::state::{ContextId, ItemId, ListItem};

/// Counters returned by [`PageCache::record_page`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordSummary {
    /// Rows inserted or refreshed.
    pub accepted: usize,
    /// Rows refused by validation.
    pub rejected: usize,
    /// Whether the whole page was dropped for belonging to another context.
    pub stale: bool,
}

/// Accumulator of every row seen for the current filter context.
///
/// Entries are keyed by id and kept in first-seen order. The cache only grows
/// until [`PageCache::reset`] discards everything for a new context; pagination
/// never evicts.
#[derive(Clone, Debug)]
pub struct PageCache<T> {
    /// Context the entries belong to.
    context: ContextId,
    /// Latest observed row per id.
    entries: IndexMap<ItemId, T>,
}

impl<T: ListItem> Default for PageCache<T> {
    fn default() -> Self {
        Self::new(ContextId::default())
    }
}

impl<T: ListItem> PageCache<T> {
    /// Create an empty cache for `context`.
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            entries: IndexMap::new(),
        }
    }

    /// What: Upsert a fetched page into the cache.
    ///
    /// Inputs:
    /// - `items`: Rows of the page.
    /// - `context`: Filter context the page was requested under.
    ///
    /// Output:
    /// - Summary of accepted/rejected rows.
    ///
    /// Details:
    /// - A page tagged with a different context is dropped whole.
    /// - Rows failing [`ListItem::validate`] are skipped and logged; an earlier
    ///   valid copy of the same id is evicted so stale data is never reused.
    /// - Server data replaces earlier copies; first-seen position is kept.
    pub fn record_page(&mut self, items: Vec<T>, context: ContextId) -> RecordSummary {
        let mut summary = RecordSummary::default();
        if context != self.context {
            tracing::debug!(
                page_context = %context,
                cache_context = %self.context,
                rows = items.len(),
                "dropping page for stale filter context"
            );
            summary.stale = true;
            return summary;
        }
        for item in items {
            if let Err(reason) = item.validate() {
                tracing::warn!(error = %reason, "rejecting list row");
                if self.entries.shift_remove(item.id()).is_some() {
                    tracing::debug!(id = %item.id(), "evicted cached copy of rejected row");
                }
                summary.rejected += 1;
                continue;
            }
            self.entries.insert(item.id().clone(), item);
            summary.accepted += 1;
        }
        summary
    }

    /// Latest observed row for `id`.
    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.entries.get(id)
    }

    /// All cached rows in first-seen order.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Ids of all cached rows in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.entries.keys()
    }

    /// Discard every entry and adopt `context`.
    pub fn reset(&mut self, context: ContextId) {
        tracing::debug!(from = %self.context, to = %context, dropped = self.entries.len(), "page cache reset");
        self.entries.clear();
        self.context = context;
    }

    /// Context the cache currently accumulates for.
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
