//! Async pagination controller.

use super::scroll::ScrollMetrics;
use super::state::{FeedState, FetchKind};
use crate::config::FeedConfig;
use crate::dimensions::{DimensionResolver, ImageProbe};
use crate::layout::{convert_reviews, ColumnState, LayoutParams};
use crate::model::{FeedItem, SourceError};
use crate::source::{PhotoResolver, ReviewQuery, ReviewSource};
use tracing::{debug, info};

/// Drives a [`FeedState`] against a review source and an image resolver.
///
/// Every load returns the number of items it added. Fetch failures are
/// logged and end pagination; they are never returned.
#[derive(Debug)]
pub struct FeedController<S, P> {
    source: S,
    resolver: DimensionResolver<P>,
    photos: PhotoResolver,
    filters: ReviewQuery,
    config: FeedConfig,
    state: FeedState,
}

impl<S: ReviewSource, P: ImageProbe> FeedController<S, P> {
    /// Controller for an empty feed `container_width` px wide.
    pub fn new(
        source: S,
        resolver: DimensionResolver<P>,
        photos: PhotoResolver,
        params: LayoutParams,
        config: FeedConfig,
        container_width: u32,
    ) -> Self {
        Self {
            source,
            resolver,
            photos,
            filters: ReviewQuery::default(),
            config,
            state: FeedState::new(container_width, params, config),
        }
    }

    /// Restrict every page to the place and author filters of `filters`.
    ///
    /// Pagination fields of `filters` are ignored.
    #[must_use]
    pub fn with_filters(mut self, filters: ReviewQuery) -> Self {
        self.filters = filters;
        self
    }

    /// First small batch, placed from the top padding.
    pub async fn load_initial(&mut self) -> usize {
        self.fetch(FetchKind::Initial).await
    }

    /// Remainder of the first page, continuing from the initial pass.
    pub async fn load_first_page_remainder(&mut self) -> usize {
        self.fetch(FetchKind::Background).await
    }

    /// Next page, placed below everything already in the feed.
    pub async fn load_more(&mut self) -> usize {
        self.fetch(FetchKind::Scroll).await
    }

    /// Whether a scroll at `metrics` should trigger [`Self::load_more`].
    pub fn should_load_more(&self, metrics: &ScrollMetrics) -> bool {
        self.state.should_load_more(metrics)
    }

    /// Load the next page if `metrics` is near the bottom.
    pub async fn on_scroll(&mut self, metrics: ScrollMetrics) -> usize {
        if self.should_load_more(&metrics) {
            self.load_more().await
        } else {
            0
        }
    }

    /// Recompute the whole layout for a new container width.
    ///
    /// No-op when the width is unchanged. Dimensions come from the cache, so
    /// a relayout normally performs no I/O.
    pub async fn set_container_width(&mut self, container_width: u32) {
        if container_width == self.state.container_width() {
            return;
        }

        self.state.reset(container_width);
        let params = *self.state.params();
        let pass = convert_reviews(
            self.state.records(),
            ColumnState::initial(&params),
            container_width,
            &params,
            &self.photos,
            &self.resolver,
        )
        .await;

        info!(
            container_width,
            items = pass.items.len(),
            "Relaid out feed for new width"
        );
        self.state.append(pass);
    }

    /// Placed items in append order.
    pub fn items(&self) -> &[FeedItem] {
        self.state.items()
    }

    /// Whether another page may exist.
    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Total laid-out height.
    pub fn content_height(&self) -> u32 {
        self.state.content_height()
    }

    /// Width the items are laid out for.
    pub fn container_width(&self) -> u32 {
        self.state.container_width()
    }

    /// Pagination state.
    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Image dimension resolver.
    pub fn resolver(&self) -> &DimensionResolver<P> {
        &self.resolver
    }

    async fn fetch(&mut self, kind: FetchKind) -> usize {
        let Some(request) = self.state.begin(kind) else {
            return 0;
        };

        let query = ReviewQuery {
            offset: request.offset,
            limit: request.limit,
            ..self.filters.clone()
        };
        debug!(?kind, offset = query.offset, limit = query.limit, "Fetching page");

        let timeout = self.config.fetch_timeout();
        let result = match tokio::time::timeout(timeout, self.source.list_reviews(&query)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                after_ms: self.config.fetch_timeout_ms,
            }),
        };

        let fresh = self.state.complete(request, result);
        if fresh.is_empty() {
            return 0;
        }

        let start = self.state.seed(kind);
        let params = *self.state.params();
        let pass = convert_reviews(
            &fresh,
            start,
            self.state.container_width(),
            &params,
            &self.photos,
            &self.resolver,
        )
        .await;

        let added = pass.items.len();
        self.state.append(pass);
        added
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
