//! Two-column placement engine.
//!
//! Pure: given records whose images are already measured, assigns every
//! card an absolute position. The pass is a fold over the records with an
//! immutable [`ColumnState`] threaded through each step.

use super::classify::{classify, footprint};
use super::column::ColumnState;
use super::params::LayoutParams;
use crate::model::{
    CardType, Dimensions, FeedItem, FeedItemId, FeedItemKind, Rect, ReviewRecord, Span,
};

/// Display URL and measured size of a record's first photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Display URL.
    pub url: String,
    /// Natural size (the 1×1 sentinel when measuring failed).
    pub dimensions: Dimensions,
}

/// A record paired with its resolved image, ready to place.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedReview<'a> {
    /// Source record.
    pub record: &'a ReviewRecord,
    /// First photo, when the record has one.
    pub image: Option<&'a ResolvedImage>,
}

/// Output of one placement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Placed cards in record order.
    pub items: Vec<FeedItem>,
    /// Cursors to resume the next pass from.
    pub end: ColumnState,
}

/// Place `reviews` in order starting from `start`.
///
/// Records with neither an image nor text produce no card.
pub fn place(
    reviews: &[ResolvedReview<'_>],
    start: ColumnState,
    container_width: u32,
    params: &LayoutParams,
) -> Placement {
    let (items, end) = reviews.iter().fold(
        (Vec::with_capacity(reviews.len()), start),
        |(mut items, state), review| {
            let (item, next) = place_one(review, state, container_width, params);
            items.extend(item);
            (items, next)
        },
    );
    Placement { items, end }
}

/// Place a single record, returning its card and the advanced cursors.
pub fn place_one(
    review: &ResolvedReview<'_>,
    state: ColumnState,
    container_width: u32,
    params: &LayoutParams,
) -> (Option<FeedItem>, ColumnState) {
    let record = review.record;

    if let Some(image) = review.image {
        let card = classify(image.dimensions, params);
        let (slot, next) = slot_for(card, state, container_width, params);
        let item = FeedItem {
            id: FeedItemId::image(&record.id),
            kind: FeedItemKind::Image,
            card: Some(card),
            image_url: Some(image.url.clone()),
            text: record.body().map(str::to_string),
            ..card_base(record, slot)
        };
        return (Some(item), next);
    }

    match record.body() {
        Some(body) => {
            let (slot, next) = slot_for(CardType::Square, state, container_width, params);
            let item = FeedItem {
                id: FeedItemId::text(&record.id),
                kind: FeedItemKind::Text,
                card: Some(CardType::Square),
                image_url: None,
                text: Some(body.to_string()),
                ..card_base(record, slot)
            };
            (Some(item), next)
        }
        None => (None, state),
    }
}

/// Position of a card of type `card` and the cursors after it.
fn slot_for(
    card: CardType,
    state: ColumnState,
    container_width: u32,
    params: &LayoutParams,
) -> ((Rect, Span), ColumnState) {
    let (width, height) = footprint(card, params);

    if card.is_full_width() {
        let rect = Rect::new(
            params.x_for(Span::Full, container_width),
            state.max_top(),
            width,
            height,
        );
        let next = state.synchronize(rect.bottom(), params.item_gap);
        return ((rect, Span::Full), next);
    }

    let column = state.shorter();
    let rect = Rect::new(
        params.x_for(column.span(), container_width),
        state.top(column),
        width,
        height,
    );
    let next = state.advance(column, rect.bottom(), params.item_gap);
    ((rect, column.span()), next)
}

fn card_base(record: &ReviewRecord, (rect, span): (Rect, Span)) -> FeedItem {
    FeedItem {
        id: FeedItemId::text(&record.id),
        kind: FeedItemKind::Text,
        card: None,
        image_url: None,
        text: None,
        author: record.display_name(),
        author_avatar: record.author_avatar.clone(),
        likes: record.likes_count,
        rect,
        span,
        place_id: record.place_id.clone(),
    }
}

#[cfg(test)]
#[path = "placement_tests.rs"]
mod tests;
