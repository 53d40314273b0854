//! Review records → placed feed items, one pass at a time.
//!
//! The only impure step of a layout pass: photos are resolved to URLs and
//! measured concurrently before the pure placement and gap-fill run.

use super::column::ColumnState;
use super::gap_fill::fill_gaps;
use super::params::LayoutParams;
use super::placement::{place, ResolvedImage, ResolvedReview};
use crate::dimensions::{DimensionResolver, ImageProbe};
use crate::model::{FeedItem, ReviewRecord};
use crate::source::PhotoResolver;
use tracing::debug;

/// Result of laying out one batch of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutPass {
    /// Cards in record order.
    pub items: Vec<FeedItem>,
    /// Cursors to resume the next pass from.
    pub end: ColumnState,
    /// Gap fillers for this pass.
    pub placeholders: Vec<FeedItem>,
}

impl LayoutPass {
    /// Cards followed by placeholders.
    pub fn into_items(self) -> Vec<FeedItem> {
        let mut items = self.items;
        items.extend(self.placeholders);
        items
    }
}

/// Lay out `records` starting at `start`.
///
/// Records whose first photo cannot be resolved to a URL are skipped
/// entirely. Every distinct photo URL is measured once, concurrently.
pub async fn convert_reviews<P: ImageProbe>(
    records: &[ReviewRecord],
    start: ColumnState,
    container_width: u32,
    params: &LayoutParams,
    photos: &PhotoResolver,
    resolver: &DimensionResolver<P>,
) -> LayoutPass {
    let with_urls: Vec<(&ReviewRecord, Option<String>)> = records
        .iter()
        .filter_map(|record| match record.first_photo() {
            None => Some((record, None)),
            Some(photo) => match photos.resolve(photo) {
                Some(url) => Some((record, Some(url))),
                None => {
                    debug!(review = %record.id, "Photo cannot be resolved, skipping review");
                    None
                }
            },
        })
        .collect();

    let sizes = resolver
        .resolve_all(with_urls.iter().filter_map(|(_, url)| url.as_deref()))
        .await;

    let images: Vec<Option<ResolvedImage>> = with_urls
        .iter()
        .map(|(_, url)| {
            url.as_ref().and_then(|url| {
                sizes.get(url).map(|dimensions| ResolvedImage {
                    url: url.clone(),
                    dimensions: *dimensions,
                })
            })
        })
        .collect();

    let resolved: Vec<ResolvedReview<'_>> = with_urls
        .iter()
        .zip(&images)
        .map(|((record, _), image)| ResolvedReview {
            record: *record,
            image: image.as_ref(),
        })
        .collect();

    let placement = place(&resolved, start, container_width, params);
    let placeholders = fill_gaps(&placement.items, start, container_width, params);

    debug!(
        records = records.len(),
        placed = placement.items.len(),
        placeholders = placeholders.len(),
        left_top = placement.end.left_top,
        right_top = placement.end.right_top,
        "Layout pass complete"
    );

    LayoutPass {
        items: placement.items,
        end: placement.end,
        placeholders,
    }
}
