//! Column cursors for the two-column grid.

use super::params::LayoutParams;
use crate::model::{FeedItem, Span};
use serde::Serialize;

/// One of the two grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Left column.
    Left,
    /// Right column.
    Right,
}

impl Column {
    /// Both columns, left first.
    pub const BOTH: [Column; 2] = [Column::Left, Column::Right];

    /// Span of a card placed in this column.
    pub fn span(self) -> Span {
        match self {
            Column::Left => Span::Left,
            Column::Right => Span::Right,
        }
    }
}

/// Next free y offset in each column.
///
/// Immutable: every placement step returns a new value instead of mutating,
/// so a pass is a fold over records and the final value is handed back to
/// the caller to resume the next pass without overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColumnState {
    /// Next free y in the left column.
    pub left_top: u32,
    /// Next free y in the right column.
    pub right_top: u32,
}

impl ColumnState {
    /// Create a cursor pair.
    pub fn new(left_top: u32, right_top: u32) -> Self {
        Self {
            left_top,
            right_top,
        }
    }

    /// Fresh cursors for an empty feed.
    pub fn initial(params: &LayoutParams) -> Self {
        Self::new(params.top_padding, params.top_padding)
    }

    /// Cursor of one column.
    pub fn top(&self, column: Column) -> u32 {
        match column {
            Column::Left => self.left_top,
            Column::Right => self.right_top,
        }
    }

    /// Column with the smaller cursor; ties favor the left column.
    pub fn shorter(&self) -> Column {
        if self.left_top <= self.right_top {
            Column::Left
        } else {
            Column::Right
        }
    }

    /// Larger of the two cursors.
    pub fn max_top(&self) -> u32 {
        self.left_top.max(self.right_top)
    }

    /// Whether both columns resume at the same offset.
    pub fn is_synchronized(&self) -> bool {
        self.left_top == self.right_top
    }

    /// Cursors after placing a card whose bottom edge is `bottom` in `column`.
    #[must_use]
    pub fn advance(self, column: Column, bottom: u32, gap: u32) -> Self {
        let next = bottom + gap;
        match column {
            Column::Left => Self::new(next, self.right_top),
            Column::Right => Self::new(self.left_top, next),
        }
    }

    /// Cursors after placing a full-width card whose bottom edge is `bottom`.
    #[must_use]
    pub fn synchronize(self, bottom: u32, gap: u32) -> Self {
        let next = bottom + gap;
        Self::new(next, next)
    }

    /// Cursors resuming below the lowest occupied edge of each column.
    ///
    /// Placeholders are ignored. A column with no items keeps the initial
    /// padding.
    pub fn from_items(items: &[FeedItem], params: &LayoutParams) -> Self {
        items
            .iter()
            .filter(|item| !item.is_placeholder())
            .fold(Self::initial(params), |state, item| {
                let next = item.rect.bottom() + params.item_gap;
                Self::new(
                    if item.span.covers(Span::Left) {
                        state.left_top.max(next)
                    } else {
                        state.left_top
                    },
                    if item.span.covers(Span::Right) {
                        state.right_top.max(next)
                    } else {
                        state.right_top
                    },
                )
            })
    }
}
