use crate::state::types::filter_fingerprint;
use crate::state::{
    ContextId, FetchRequest, FilterPatch, FilterSet, PageInfo, PageQuery, RequestTag, SortDirection,
};

/// How a response relates to the controller's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// Latest request of the current filter context.
    Current,
    /// Current filter context, but a newer request has been dispatched since.
    Superseded,
    /// Issued under an earlier filter context.
    Stale,
}

/// Owner of the list query parameters and request tagging.
///
/// Every filter change starts a new [`ContextId`]; sort and page changes keep
/// it. Each dispatched request gets a monotonically increasing id so late
/// responses can be told apart from the latest one.
#[derive(Clone, Debug)]
pub struct QueryController {
    /// Active filters.
    filters: FilterSet,
    /// Sort column.
    sort_key: Option<String>,
    /// Sort direction.
    sort_direction: SortDirection,
    /// Offset of the visible page.
    offset: usize,
    /// Page size.
    limit: usize,
    /// Current filter context.
    context: ContextId,
    /// Id for the next dispatched request.
    next_request_id: u64,
    /// Id of the most recently dispatched request.
    latest_request_id: u64,
}

impl QueryController {
    /// Create a controller for `filters` with page size `limit`.
    pub fn new(filters: FilterSet, limit: usize) -> Self {
        let context = ContextId {
            generation: 1,
            fingerprint: filter_fingerprint(&filters),
        };
        Self {
            filters,
            sort_key: None,
            sort_direction: SortDirection::default(),
            offset: 0,
            limit: limit.max(1),
            context,
            next_request_id: 1,
            latest_request_id: 0,
        }
    }

    /// Current filter context.
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Active filters.
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Active sort column and direction.
    pub fn sort(&self) -> (Option<&str>, SortDirection) {
        (self.sort_key.as_deref(), self.sort_direction)
    }

    /// Pagination view with `total_count` filled in by the caller.
    pub const fn page_info(&self, total_count: usize) -> PageInfo {
        PageInfo {
            offset: self.offset,
            limit: self.limit,
            total_count,
        }
    }

    /// Query reflecting the current parameters.
    pub fn query(&self) -> PageQuery {
        PageQuery {
            filters: self.filters.clone(),
            sort_key: self.sort_key.clone(),
            sort_direction: self.sort_direction,
            offset: self.offset,
            limit: self.limit,
        }
    }

    /// What: Apply a filter patch and start a new filter context.
    ///
    /// Output:
    /// - Request for the first page of the new context (selection not kept).
    ///
    /// Details:
    /// - Always bumps the generation, even when the patch leaves the filters unchanged.
    /// - Resets the offset to the first page.
    pub fn set_filter(&mut self, patch: FilterPatch) -> FetchRequest {
        for (key, value) in patch {
            match value {
                Some(v) if !v.is_empty() => {
                    self.filters.insert(key, v);
                }
                _ => {
                    self.filters.remove(&key);
                }
            }
        }
        self.context = ContextId {
            generation: self.context.generation + 1,
            fingerprint: filter_fingerprint(&self.filters),
        };
        self.offset = 0;
        tracing::info!(context = %self.context, filters = ?self.filters, "filter context changed");
        self.dispatch(false)
    }

    /// Change the sort; keeps context and selection.
    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) -> FetchRequest {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self.dispatch(true)
    }

    /// Change the page; keeps context and selection. A zero `limit` is raised to one.
    pub fn set_page(&mut self, offset: usize, limit: usize) -> FetchRequest {
        self.offset = offset;
        self.limit = limit.max(1);
        self.dispatch(true)
    }

    /// Re-run the current query.
    pub fn refresh(&mut self, keep_checked_items: bool) -> FetchRequest {
        self.dispatch(keep_checked_items)
    }

    /// What: Tag and record a request for the current parameters.
    fn dispatch(&mut self, keep_checked_items: bool) -> FetchRequest {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request_id = request_id;
        FetchRequest {
            tag: RequestTag {
                context: self.context,
                request_id,
            },
            query: self.query(),
            keep_checked_items,
        }
    }

    /// Classify a response tag against the current state.
    pub fn freshness(&self, tag: &RequestTag) -> Freshness {
        if tag.context != self.context {
            Freshness::Stale
        } else if tag.request_id == self.latest_request_id {
            Freshness::Current
        } else {
            Freshness::Superseded
        }
    }
}
