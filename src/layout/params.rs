//! Visual constants of the masonry grid.

use crate::model::Span;
use serde::Deserialize;

/// Every constant that affects card placement.
///
/// Loaded from the `[layout]` table of the config file; missing keys keep
/// their defaults. Two params are equal iff they produce identical layouts
/// for the same records and container width.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutParams {
    /// Width of a single-column card.
    pub column_width: u32,
    /// Horizontal gap between the two columns.
    pub column_gap: u32,
    /// Vertical gap left below every card.
    pub item_gap: u32,
    /// Initial cursor of both columns.
    pub top_padding: u32,
    /// Height of a full-width card.
    pub wide_height: u32,
    /// Height of a tall card.
    pub tall_height: u32,
    /// Side length of square image cards and text cards.
    pub square_size: u32,
    /// Aspect ratios strictly above this are wide.
    pub wide_ratio: f64,
    /// Aspect ratios strictly below this are tall.
    pub tall_ratio: f64,
    /// Smallest gap that receives a placeholder.
    pub min_fill: u32,
    /// Upper bound on placeholders synthesized by one pass.
    pub max_placeholders: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            column_width: 160,
            column_gap: 16,
            item_gap: 16,
            top_padding: 20,
            wide_height: 160,
            tall_height: 240,
            square_size: 160,
            wide_ratio: 1.5,
            tall_ratio: 0.8,
            min_fill: 16,
            max_placeholders: 100,
        }
    }
}

impl LayoutParams {
    /// Width spanned by both columns and the gap between them.
    pub fn content_width(&self) -> u32 {
        self.column_width * 2 + self.column_gap
    }

    /// X offset of the left column, centering the grid in the container.
    ///
    /// Saturates at 0 when the container is narrower than the grid.
    pub fn left_x(&self, container_width: u32) -> u32 {
        container_width.saturating_sub(self.content_width()) / 2
    }

    /// X offset of the right column.
    pub fn right_x(&self, container_width: u32) -> u32 {
        self.left_x(container_width) + self.column_width + self.column_gap
    }

    /// X offset of a card with the given span.
    pub fn x_for(&self, span: Span, container_width: u32) -> u32 {
        match span {
            Span::Left | Span::Full => self.left_x(container_width),
            Span::Right => self.right_x(container_width),
        }
    }

    /// Width of a card with the given span.
    pub fn width_for(&self, span: Span) -> u32 {
        match span {
            Span::Full => self.content_width(),
            Span::Left | Span::Right => self.column_width,
        }
    }
}
