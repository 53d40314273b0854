//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod feed_item;
pub mod geometry;
pub mod identifiers;
pub mod key_action;
pub mod review;

// Re-export for convenience
pub use error::{AppError, ParseError, ProbeError, SourceError, StoreError};
pub use feed_item::{FeedItem, FeedItemKind};
pub use geometry::{CardType, Dimensions, Rect, Span};
pub use identifiers::{FeedItemId, InvalidPlaceId, InvalidReviewId, PlaceId, ReviewId};
pub use key_action::KeyAction;
pub use review::{shorten_wallet, PhotoDescriptor, ReviewRecord};
