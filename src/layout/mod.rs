//! Masonry layout.
//!
//! Everything here except [`convert_reviews`] is pure: placement is a fold
//! over records threading an immutable [`ColumnState`], and gap filling is a
//! function of the placed items.

pub mod classify;
pub mod column;
pub mod convert;
pub mod gap_fill;
pub mod params;
pub mod placement;

pub use classify::{classify, footprint};
pub use column::{Column, ColumnState};
pub use convert::{convert_reviews, LayoutPass};
pub use gap_fill::fill_gaps;
pub use params::LayoutParams;
pub use placement::{place, place_one, Placement, ResolvedImage, ResolvedReview};
