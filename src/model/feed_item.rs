//! Placed feed cards.

use super::geometry::{CardType, Rect, Span};
use super::identifiers::{FeedItemId, PlaceId};
use serde::Serialize;

/// What a card displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedItemKind {
    /// Photo card, optionally captioned with the review text.
    Image,
    /// Text-only card.
    Text,
    /// Invisible filler closing a vertical gap in one column.
    Placeholder,
}

/// One visual card with its computed position.
///
/// Immutable once placed: later passes append new items but never move
/// existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    /// Stable identity.
    pub id: FeedItemId,
    /// Card kind.
    pub kind: FeedItemKind,
    /// Footprint bucket; `None` for placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardType>,
    /// Display URL of the photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Review text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Author display name; empty for placeholders.
    pub author: String,
    /// Author avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    /// Like count.
    pub likes: u32,
    /// Position and size.
    #[serde(flatten)]
    pub rect: Rect,
    /// Columns occupied.
    pub span: Span,
    /// Place to navigate to on click.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
}

impl FeedItem {
    /// Build a placeholder card in a single column.
    pub fn placeholder(column: Span, rect: Rect) -> Self {
        let name = match column {
            Span::Left => "left",
            Span::Right => "right",
            Span::Full => "full",
        };
        Self {
            id: FeedItemId::placeholder(name, rect.top),
            kind: FeedItemKind::Placeholder,
            card: None,
            image_url: None,
            text: None,
            author: String::new(),
            author_avatar: None,
            likes: 0,
            rect,
            span: column,
            place_id: None,
        }
    }

    /// Whether this is a filler card.
    pub fn is_placeholder(&self) -> bool {
        self.kind == FeedItemKind::Placeholder
    }

    /// Whether the card spans both columns.
    pub fn is_full_width(&self) -> bool {
        self.span == Span::Full
    }
}
