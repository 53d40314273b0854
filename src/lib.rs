//! reviewfeed
//!
//! Two-column masonry layout for restaurant reviews, with incremental
//! pagination and a terminal viewer.
//!
//! The layout engine ([`layout`]) and pagination state ([`feed::FeedState`])
//! are pure; review sources, image probes and the TUI form the impure shell
//! around them.

pub mod config;
pub mod dimensions;
pub mod feed;
pub mod layout;
pub mod logging;
pub mod model;
pub mod source;
pub mod view;
