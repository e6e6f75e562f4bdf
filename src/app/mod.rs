//! Per-screen list engine: cache, selection, snapshot and query state behind
//! one event-driven facade.
//!
//! The rendering layer dispatches events (`on_*`) and reads derived state
//! (`list`, `cache_list`, `selected_value`, `aggregate`). Every transition is
//! synchronous; only page fetches and checkout submission cross an async
//! boundary, and their results come back through [`ListEngine::apply_response`]
//! and [`checkout::submit_checkout`].

pub mod checkout;
pub mod workers;

use tokio::sync::mpsc;

use crate::error::{EngineError, ValidationError};
use crate::logic::{
    Aggregate, CheckoutPayload, Freshness, PageCache, QueryController, RecordSummary,
    SelectionSnapshot, SelectionTracker,
};
use crate::state::{
    CheckState, ContextId, EngineSettings, FetchRequest, FilterPatch, FilterSet, ItemId, ListItem,
    PageInfo, PageResponse, RefreshOptions, SelectAllScope, SortDirection,
};

/// What happened to a page response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Recorded and shown as the visible page.
    Applied(RecordSummary),
    /// Recorded into the cache; a newer request owns the visible page.
    Superseded(RecordSummary),
    /// Issued under an earlier filter context and discarded.
    Stale,
}

/// Selection, edit and aggregation engine for one paged list screen.
#[derive(Debug)]
pub struct ListEngine<T> {
    /// Settings the engine was created with.
    settings: EngineSettings,
    /// Query parameters and request tagging.
    controller: QueryController,
    /// Rows seen under the current filter context.
    cache: PageCache<T>,
    /// Checked ids.
    selection: SelectionTracker,
    /// Edit-preserving view of the selection.
    snapshot: SelectionSnapshot,
    /// Ids of the visible page in server order.
    visible: Vec<ItemId>,
    /// Total rows reported by the latest current response.
    total_count: usize,
    /// Optional outlet for refetch events.
    dispatcher: Option<mpsc::UnboundedSender<FetchRequest>>,
}

impl<T: ListItem> ListEngine<T> {
    /// Create an engine for `filters` using the page size from `settings`.
    pub fn new(settings: EngineSettings, filters: FilterSet) -> Self {
        let controller = QueryController::new(filters, settings.page_size);
        let cache = PageCache::new(controller.context());
        Self {
            settings,
            controller,
            cache,
            selection: SelectionTracker::new(),
            snapshot: SelectionSnapshot::default(),
            visible: Vec::new(),
            total_count: 0,
            dispatcher: None,
        }
    }

    /// Also push every refetch event onto `tx` (e.g. a fetch worker's queue).
    #[must_use]
    pub fn with_dispatcher(mut self, tx: mpsc::UnboundedSender<FetchRequest>) -> Self {
        self.dispatcher = Some(tx);
        self
    }

    /// Request for the first page on mount.
    pub fn initial_request(&mut self) -> FetchRequest {
        let req = self.controller.refresh(true);
        self.emit(req)
    }

    /// What: Forward a refetch event to the dispatcher, if any, and hand it back.
    fn emit(&self, req: FetchRequest) -> FetchRequest {
        if let Some(tx) = &self.dispatcher
            && tx.send(req.clone()).is_err()
        {
            tracing::warn!(request_id = req.tag.request_id, "fetch dispatcher closed");
        }
        req
    }

    // ---- read accessors ----

    /// Rows of the visible page in server order.
    pub fn list(&self) -> Vec<&T> {
        self.visible.iter().filter_map(|id| self.cache.get(id)).collect()
    }

    /// Every row loaded for the current filter context, first-seen order.
    pub fn cache_list(&self) -> Vec<&T> {
        self.cache.all().collect()
    }

    /// Edit-preserving snapshot of the selection.
    pub const fn selected_value(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    /// Checked ids in selection order, resolvable or not.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selection.selected_ids()
    }

    /// Whether `id` is checked.
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.is_selected(id)
    }

    /// Totals derived from the current snapshot.
    pub fn aggregate(&self) -> Aggregate {
        crate::logic::compute(&self.snapshot, &self.settings.currencies)
    }

    /// Header checkbox state for the visible page.
    pub fn header_check_state(&self) -> CheckState {
        self.selection.check_state(&self.visible, &self.cache)
    }

    /// Pagination view.
    pub const fn page_info(&self) -> PageInfo {
        self.controller.page_info(self.total_count)
    }

    /// Current filter context.
    pub const fn context(&self) -> ContextId {
        self.controller.context()
    }

    /// Settings in use.
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ---- events ----

    /// What: Handle a row checkbox click.
    ///
    /// Output:
    /// - `true` when the row is checked afterwards.
    ///
    /// Details:
    /// - Unchecking always succeeds.
    /// - Checking a loaded row that is not selectable is refused.
    pub fn on_row_toggled(&mut self, id: &ItemId) -> bool {
        if !self.selection.is_selected(id)
            && let Some(item) = self.cache.get(id)
            && !item.is_selectable()
        {
            tracing::debug!(id = %id, "refusing to select disabled row");
            return false;
        }
        let checked = self.selection.toggle(id);
        tracing::debug!(id = %id, checked, "row toggled");
        self.resync_snapshot();
        checked
    }

    /// What: Handle the header "select all" checkbox.
    ///
    /// Output:
    /// - Number of rows whose state changed.
    ///
    /// Details:
    /// - Acts on the visible page or on every loaded row, per `select_all_scope`.
    /// - Disabled rows are skipped when checking.
    pub fn on_select_all_toggled(&mut self, checked: bool) -> usize {
        let ids: Vec<ItemId> = match self.settings.select_all_scope {
            SelectAllScope::Page => self.visible.clone(),
            SelectAllScope::Loaded => self.cache.ids().cloned().collect(),
        };
        let changed = self.selection.toggle_all(&ids, checked, &self.cache);
        tracing::debug!(checked, candidates = ids.len(), changed, "select all toggled");
        self.resync_snapshot();
        changed
    }

    /// What: Commit typed text into a selected row's amount.
    ///
    /// Details:
    /// - The text is sanitized for the row's currency first.
    /// - Rows without a snapshot entry are ignored.
    /// - Only that entry changes; the cache is not consulted.
    pub fn on_field_edited(&mut self, id: &ItemId, value: &str) -> &SelectionSnapshot {
        let decimals = self
            .snapshot
            .get(id)
            .map(|e| self.settings.currencies.decimals_for(&e.currency_code));
        match decimals {
            Some(dp) => {
                let clean = crate::logic::sanitize_amount_input(value, dp);
                self.snapshot.edit_field(id, clean);
            }
            None => tracing::debug!(id = %id, "edit for row without snapshot entry ignored"),
        }
        &self.snapshot
    }

    /// Apply a filter patch: new context, empty cache, empty selection.
    pub fn on_filter_changed(&mut self, patch: FilterPatch) -> FetchRequest {
        let req = self.controller.set_filter(patch);
        self.cache.reset(req.tag.context);
        self.selection.clear();
        self.snapshot.clear();
        self.visible.clear();
        self.total_count = 0;
        self.emit(req)
    }

    /// Change sorting; cache and selection survive.
    pub fn on_sort_changed(&mut self, key: &str, direction: SortDirection) -> FetchRequest {
        let req = self.controller.set_sort(key, direction);
        self.emit(req)
    }

    /// Change page or page size; cache and selection survive.
    pub fn on_page_changed(&mut self, offset: usize, limit: usize) -> FetchRequest {
        let req = self.controller.set_page(offset, limit);
        self.emit(req)
    }

    /// What: Re-fetch the current page.
    ///
    /// Details:
    /// - With `keep_checked_items` the selection and its edits survive.
    /// - Without it the selection is cleared; the filter context and cache stay.
    pub fn on_refresh(&mut self, options: RefreshOptions) -> FetchRequest {
        if !options.keep_checked_items {
            self.selection.clear();
            self.snapshot.clear();
        }
        let req = self.controller.refresh(options.keep_checked_items);
        self.emit(req)
    }

    /// What: Feed a page response back into the engine.
    ///
    /// Output:
    /// - `Ok(ApplyOutcome)` describing what was done with the page.
    ///
    /// # Errors
    /// - `EngineError::Remote` when a non-stale request failed; state is unchanged.
    ///
    /// Details:
    /// - Responses from an earlier filter context are discarded, errors included.
    /// - Superseded responses still refresh the cache but not the visible page.
    pub fn apply_response(&mut self, response: PageResponse<T>) -> Result<ApplyOutcome, EngineError> {
        let freshness = self.controller.freshness(&response.tag);
        if freshness == Freshness::Stale {
            tracing::debug!(
                response_context = %response.tag.context,
                current_context = %self.controller.context(),
                request_id = response.tag.request_id,
                "discarding stale page response"
            );
            return Ok(ApplyOutcome::Stale);
        }
        let page = response.result.map_err(|e| {
            tracing::warn!(error = %e, request_id = response.tag.request_id, "page fetch failed");
            EngineError::Remote(e)
        })?;
        let ids: Vec<ItemId> = page.items.iter().map(|item| item.id().clone()).collect();
        let summary = self.cache.record_page(page.items, response.tag.context);
        if freshness == Freshness::Current {
            self.visible = ids
                .into_iter()
                .filter(|id| self.cache.get(id).is_some())
                .collect();
            self.total_count = page.total_count;
        }
        self.resync_snapshot();
        tracing::debug!(
            request_id = response.tag.request_id,
            accepted = summary.accepted,
            rejected = summary.rejected,
            current = freshness == Freshness::Current,
            "page applied"
        );
        Ok(match freshness {
            Freshness::Current => ApplyOutcome::Applied(summary),
            _ => ApplyOutcome::Superseded(summary),
        })
    }

    /// What: Validate the snapshot into a checkout payload.
    ///
    /// # Errors
    /// - Any [`ValidationError`] from the payload builder; engine state is untouched.
    pub fn build_checkout(&self) -> Result<CheckoutPayload, ValidationError> {
        let payload = crate::logic::build(&self.snapshot, self.settings.mixed_currency)?;
        tracing::info!(
            lines = payload.line_items.len(),
            currency = %payload.currency,
            "checkout payload built"
        );
        Ok(payload)
    }

    /// What: Payload paying the full open balance of one loaded row.
    ///
    /// # Errors
    /// - `UnknownItem` when `id` is not loaded
    /// - Validation errors of [`crate::logic::build_single`]
    pub fn build_single_checkout(&self, id: &ItemId) -> Result<CheckoutPayload, ValidationError> {
        let item = self
            .cache
            .get(id)
            .ok_or_else(|| ValidationError::UnknownItem { id: id.clone() })?;
        crate::logic::build_single(item, &self.settings.currencies)
    }

    /// Re-derive the snapshot from selection and cache, keeping edits.
    fn resync_snapshot(&mut self) {
        let ids = self.selection.selected_ids();
        self.snapshot = crate::logic::reconcile(
            &ids,
            &self.cache,
            &self.snapshot,
            &self.settings.currencies,
        );
    }
}
