//! Card type classification by image aspect ratio.

use super::params::LayoutParams;
use crate::model::{CardType, Dimensions};

/// Map an image's natural size to one of the three fixed footprints.
///
/// Total: a zero-sized side maps to [`CardType::Square`].
///
/// # Examples
///
/// ```
/// # use reviewfeed::layout::{classify, LayoutParams};
/// # use reviewfeed::model::{CardType, Dimensions};
/// let params = LayoutParams::default();
/// assert_eq!(classify(Dimensions::new(1200, 600), &params), CardType::Wide);
/// assert_eq!(classify(Dimensions::new(300, 600), &params), CardType::Tall);
/// assert_eq!(classify(Dimensions::new(0, 0), &params), CardType::Square);
/// ```
pub fn classify(dimensions: Dimensions, params: &LayoutParams) -> CardType {
    match dimensions.aspect_ratio() {
        Some(ratio) if ratio > params.wide_ratio => CardType::Wide,
        Some(ratio) if ratio < params.tall_ratio => CardType::Tall,
        _ => CardType::Square,
    }
}

/// `(width, height)` of a card type.
pub fn footprint(card: CardType, params: &LayoutParams) -> (u32, u32) {
    match card {
        CardType::Wide => (params.content_width(), params.wide_height),
        CardType::Tall => (params.column_width, params.tall_height),
        CardType::Square => (params.square_size, params.square_size),
    }
}
