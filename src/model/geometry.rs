//! Pixel geometry shared by the layout engine and the renderer.
//!
//! All values are device-independent pixels.

use serde::{Deserialize, Serialize};

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Size reported for images that failed to load. Never cached.
    pub const SENTINEL: Self = Self {
        width: 1,
        height: 1,
    };

    /// Create new dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, `None` when either side is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }
}

/// Absolute position and size of a placed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: u32,
    /// Top edge.
    pub top: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Y offset immediately below this rect (exclusive).
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// X offset immediately right of this rect (exclusive).
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Whether `[top, bottom)` intersects `[other.top, other.bottom)`.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top < other.bottom() && other.top < self.bottom()
    }
}

/// Horizontal extent of a card in the two-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    /// Left column only.
    Left,
    /// Right column only.
    Right,
    /// Both columns.
    Full,
}

impl Span {
    /// Whether a card with this span occupies the given single-column span.
    pub fn covers(&self, column: Span) -> bool {
        *self == Span::Full || *self == column
    }
}

/// Fixed footprint a card is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Full-width landscape card.
    Wide,
    /// Narrow, taller portrait card.
    Tall,
    /// Square card, also used for text-only reviews.
    Square,
}

impl CardType {
    /// Whether the card spans both columns.
    pub fn is_full_width(&self) -> bool {
        matches!(self, CardType::Wide)
    }
}
