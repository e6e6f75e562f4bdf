use indexmap::IndexSet;

use crate::logic::cache::PageCache;
use crate::state::{CheckState, ItemId, ListItem};

/// Set of checked row ids, independent of the visible page.
///
/// Ids are kept in the order they were first selected. An id may stay selected
/// while its row is not in the cache; aggregation simply skips it until the
/// row is seen again.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    /// Checked ids in selection order.
    selected: IndexSet<ItemId>,
}

impl SelectionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Flip the checked state of `id`.
    ///
    /// Output:
    /// - `true` when the id is selected afterwards.
    ///
    /// Details:
    /// - Deselecting uses `shift_remove` so the remaining order is preserved;
    ///   re-selecting appends the id at the end.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.selected.shift_remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// What: Check or uncheck many ids at once ("select all").
    ///
    /// Inputs:
    /// - `ids`: Candidate ids; may span several pages.
    /// - `checked`: Target state.
    /// - `cache`: Used to resolve selectability.
    ///
    /// Output:
    /// - Number of ids whose state changed.
    ///
    /// Details:
    /// - When checking, ids that are unresolved or not selectable are skipped.
    /// - When unchecking, every listed id is removed.
    pub fn toggle_all<T: ListItem>(
        &mut self,
        ids: &[ItemId],
        checked: bool,
        cache: &PageCache<T>,
    ) -> usize {
        let mut changed = 0usize;
        for id in ids {
            if checked {
                let selectable = cache.get(id).is_some_and(|item| item.is_selectable());
                if selectable && self.selected.insert(id.clone()) {
                    changed += 1;
                }
            } else if self.selected.shift_remove(id) {
                changed += 1;
            }
        }
        changed
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Whether `id` is checked.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// Checked ids in selection order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selected.iter().cloned().collect()
    }

    /// Number of checked ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is checked.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// What: Header checkbox state for the rows in `ids`.
    ///
    /// Details:
    /// - Only resolved, selectable rows count; with none of those the header is unchecked.
    pub fn check_state<T: ListItem>(&self, ids: &[ItemId], cache: &PageCache<T>) -> CheckState {
        let (total, checked) = ids
            .iter()
            .filter(|id| cache.get(id).is_some_and(|item| item.is_selectable()))
            .fold((0usize, 0usize), |(t, c), id| {
                (t + 1, c + usize::from(self.selected.contains(id)))
            });
        if total == 0 || checked == 0 {
            CheckState::Unchecked
        } else if checked == total {
            CheckState::Checked
        } else {
            CheckState::Partial
        }
    }
}
