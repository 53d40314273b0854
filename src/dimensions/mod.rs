//! Image dimension resolution.
//!
//! Layout needs every image's natural size before a card can be classified.
//! Sizes come from a bounded FIFO [`DimensionCache`] (optionally mirrored to a
//! [`KeyValueStore`] so they survive restarts) and, on a miss, from an
//! [`ImageProbe`] run by the [`DimensionResolver`].

pub mod cache;
pub mod probe;
pub mod resolver;
pub mod store;

pub use cache::{store_key, DimensionCache, DEFAULT_MAX_ENTRIES, KEY_PREFIX};
pub use probe::{dimensions_from_bytes, DefaultProbe, FileProbe, HttpProbe, ImageProbe};
pub use resolver::DimensionResolver;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
