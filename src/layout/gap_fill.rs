//! Placeholder synthesis for vertical gaps left in a column.
//!
//! A gap appears whenever a column's cursor jumps, most commonly when a
//! full-width card starts below the taller column and the shorter one is
//! left with empty space above it.

use super::column::{Column, ColumnState};
use super::params::LayoutParams;
use crate::model::{FeedItem, Rect};
use tracing::debug;

/// Placeholders closing the gaps between `items` of one pass.
///
/// Each column is walked in top order over its own cards plus every
/// full-width card. A gap of at least `min_fill` pixels between the next free
/// offset and the following card gets exactly one placeholder, unless the gap
/// overlaps a full-width card. At most `max_placeholders` are produced.
pub fn fill_gaps(
    items: &[FeedItem],
    start: ColumnState,
    container_width: u32,
    params: &LayoutParams,
) -> Vec<FeedItem> {
    let full_width: Vec<Rect> = items
        .iter()
        .filter(|item| item.is_full_width() && !item.is_placeholder())
        .map(|item| item.rect)
        .collect();

    let mut placeholders = Vec::new();

    for column in Column::BOTH {
        let span = column.span();
        let mut members: Vec<&FeedItem> = items
            .iter()
            .filter(|item| !item.is_placeholder() && item.span.covers(span))
            .collect();
        members.sort_by_key(|item| item.rect.top);

        let mut free_y = start.top(column);
        for item in members {
            let slack = item.rect.top.saturating_sub(free_y);
            if slack >= params.min_fill {
                let gap = Rect::new(
                    params.x_for(span, container_width),
                    free_y,
                    params.column_width,
                    slack,
                );
                if full_width.iter().any(|wide| wide.overlaps_vertically(&gap)) {
                    debug!(
                        top = gap.top,
                        height = gap.height,
                        "Gap overlaps a full-width card, not filled"
                    );
                } else if placeholders.len() >= params.max_placeholders {
                    debug!(
                        limit = params.max_placeholders,
                        "Placeholder limit reached"
                    );
                    return placeholders;
                } else {
                    placeholders.push(FeedItem::placeholder(span, gap));
                }
            }
            free_y = free_y.max(item.rect.bottom() + params.item_gap);
        }
    }

    placeholders
}
