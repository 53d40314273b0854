//! Pure pagination state.
//!
//! [`FeedState`] owns everything the feed knows and decides every
//! transition; the async controller only performs the I/O it is told to.
//! A fetch is a `begin` → (I/O) → `complete` → `seed` → (layout) → `append`
//! sequence.

use super::scroll::ScrollMetrics;
use crate::config::FeedConfig;
use crate::layout::{ColumnState, LayoutParams, LayoutPass};
use crate::model::{FeedItem, ReviewId, ReviewRecord, SourceError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Which fetch a page request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Small first batch for a fast first paint.
    Initial,
    /// Rest of the first page, fetched right after the initial batch.
    Background,
    /// Next page, triggered by scrolling near the bottom.
    Scroll,
}

/// One granted page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Fetch this request belongs to.
    pub kind: FetchKind,
    /// Records to skip.
    pub offset: usize,
    /// Records to request.
    pub limit: usize,
}

/// Items, fetched records and pagination flags of one feed.
#[derive(Debug, Clone)]
pub struct FeedState {
    items: Vec<FeedItem>,
    records: Vec<ReviewRecord>,
    seen: HashSet<ReviewId>,
    cursor: ColumnState,
    fetched: usize,
    has_more: bool,
    loading: bool,
    container_width: u32,
    params: LayoutParams,
    config: FeedConfig,
}

impl FeedState {
    /// Empty feed laid out in a container `container_width` px wide.
    pub fn new(container_width: u32, params: LayoutParams, config: FeedConfig) -> Self {
        Self {
            items: Vec::new(),
            records: Vec::new(),
            seen: HashSet::new(),
            cursor: ColumnState::initial(&params),
            fetched: 0,
            has_more: true,
            loading: false,
            container_width,
            params,
            config,
        }
    }

    /// Start a fetch of `kind`, or `None` if one may not start now.
    ///
    /// Refused while another fetch is in flight, once the feed is exhausted,
    /// for `Initial` once records exist, and for `Background` once the first
    /// page is complete.
    pub fn begin(&mut self, kind: FetchKind) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            debug!(?kind, loading = self.loading, has_more = self.has_more, "Fetch refused");
            return None;
        }

        let limit = match kind {
            FetchKind::Initial if self.fetched > 0 => return None,
            FetchKind::Initial => self.config.initial_batch,
            FetchKind::Background => self.config.page_size.saturating_sub(self.fetched),
            FetchKind::Scroll => self.config.page_size,
        };
        if limit == 0 {
            return None;
        }

        self.loading = true;
        Some(PageRequest {
            kind,
            offset: self.fetched,
            limit,
        })
    }

    /// Finish `request` with the source's `result`, returning the records
    /// not seen before.
    ///
    /// A short page, a non-empty page of only duplicates, or an error marks
    /// the feed exhausted. Errors are logged, never retried.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Vec<ReviewRecord>, SourceError>,
    ) -> Vec<ReviewRecord> {
        self.loading = false;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!(kind = ?request.kind, offset = request.offset, error = %e, "Fetch failed, treating feed as exhausted");
                self.has_more = false;
                return Vec::new();
            }
        };

        let received = raw.len();
        self.fetched += received;
        if received < request.limit {
            self.has_more = false;
        }

        let fresh: Vec<ReviewRecord> = raw
            .into_iter()
            .filter(|record| self.seen.insert(record.id.clone()))
            .collect();

        if received > 0 && fresh.is_empty() {
            debug!(offset = request.offset, "Page held only known reviews");
            self.has_more = false;
        }

        debug!(
            kind = ?request.kind,
            received,
            fresh = fresh.len(),
            has_more = self.has_more,
            "Page received"
        );

        self.records.extend(fresh.iter().cloned());
        fresh
    }

    /// Cursor a pass of `kind` starts from.
    pub fn seed(&self, kind: FetchKind) -> ColumnState {
        match kind {
            FetchKind::Initial => ColumnState::initial(&self.params),
            FetchKind::Background => self.cursor,
            FetchKind::Scroll => ColumnState::from_items(&self.items, &self.params),
        }
    }

    /// Append a finished pass; existing items are never touched.
    pub fn append(&mut self, pass: LayoutPass) {
        self.cursor = pass.end;
        self.items.extend(pass.into_items());
    }

    /// Discard the layout for a new container width, keeping fetched records.
    pub fn reset(&mut self, container_width: u32) {
        self.container_width = container_width;
        self.items.clear();
        self.cursor = ColumnState::initial(&self.params);
    }

    /// Whether a scroll at `metrics` should request the next page.
    pub fn should_load_more(&self, metrics: &ScrollMetrics) -> bool {
        !self.loading && self.has_more && metrics.is_near_bottom(self.config.scroll_threshold)
    }

    /// Placed items, cards and placeholders, in append order.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Every record fetched so far, deduplicated, in fetch order.
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    /// Cursor after the last appended pass.
    pub fn cursor(&self) -> ColumnState {
        self.cursor
    }

    /// Records received from the source, duplicates included.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Whether another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Width the current items were laid out for.
    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    /// Layout constants.
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Lowest bottom edge of any item, plus the trailing gap.
    pub fn content_height(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.rect.bottom() + self.params.item_gap)
            .max()
            .unwrap_or(self.params.top_padding)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
