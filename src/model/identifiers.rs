//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a review record as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewId(String);

impl ReviewId {
    /// Smart constructor: validates non-empty review id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidReviewId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidReviewId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReviewId {
    type Error = InvalidReviewId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewId> for String {
    fn from(id: ReviewId) -> Self {
        id.0
    }
}

/// Identifier of a place (restaurant) a review is attached to.
///
/// Emitted when a card is clicked; the surrounding application owns
/// resolving it to a detail view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Smart constructor: validates non-empty place id.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidPlaceId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidPlaceId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = InvalidPlaceId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

/// Identity of a rendered feed card.
///
/// Derived from the source review id plus the card kind
/// (`{review}-image`, `{review}-text`), or from the column and offset for
/// placeholders. Never empty because it is only built from those parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeedItemId(String);

impl FeedItemId {
    /// Id of the image card built from `review`.
    pub fn image(review: &ReviewId) -> Self {
        Self(format!("{}-image", review.as_str()))
    }

    /// Id of the text card built from `review`.
    pub fn text(review: &ReviewId) -> Self {
        Self(format!("{}-text", review.as_str()))
    }

    /// Id of a placeholder in the named column at vertical offset `top`.
    pub fn placeholder(column: &str, top: u32) -> Self {
        Self(format!("placeholder-{column}-{top}"))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

/// Rejected review id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReviewId {
    /// The id was an empty string.
    #[error("Review ID cannot be empty")]
    Empty,
}

/// Rejected place id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPlaceId {
    /// The id was an empty string.
    #[error("Place ID cannot be empty")]
    Empty,
}

// ===== Tests =====
