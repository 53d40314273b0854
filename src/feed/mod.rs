//! Incremental pagination.
//!
//! The first page arrives in two steps (a small batch for a fast first
//! paint, then the remainder in the background); later pages are requested
//! when the viewport nears the bottom. Each page is laid out from a cursor
//! below everything already placed, so items only ever append.

pub mod controller;
pub mod scroll;
pub mod state;

pub use controller::FeedController;
pub use scroll::ScrollMetrics;
pub use state::{FeedState, FetchKind, PageRequest};
