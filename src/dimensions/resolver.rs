//! Cache-first dimension lookup with a bounded probe.

use super::cache::DimensionCache;
use super::probe::ImageProbe;
use super::store::KeyValueStore;
use crate::model::Dimensions;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Resolves image URLs to natural sizes.
///
/// A cache hit returns without I/O. A miss runs the probe under a timeout;
/// successes are cached, while failures and timeouts yield
/// [`Dimensions::SENTINEL`] and stay uncached so a later pass retries.
#[derive(Debug)]
pub struct DimensionResolver<P> {
    cache: Mutex<DimensionCache>,
    probe: P,
    timeout: Duration,
}

impl<P: ImageProbe> DimensionResolver<P> {
    /// Resolver over `cache`, probing misses with `probe`.
    pub fn new(cache: DimensionCache, probe: P, timeout: Duration) -> Self {
        Self {
            cache: Mutex::new(cache),
            probe,
            timeout,
        }
    }

    /// Cached size of `url`, without probing.
    pub fn get(&self, url: &str) -> Option<Dimensions> {
        self.lock().get(url)
    }

    /// Size of the image at `url`. Never fails.
    pub async fn resolve(&self, url: &str) -> Dimensions {
        if let Some(cached) = self.get(url) {
            trace!(url, "Dimension cache hit");
            return cached;
        }

        match tokio::time::timeout(self.timeout, self.probe.probe(url)).await {
            Ok(Ok(dimensions)) => {
                self.lock().insert(url, dimensions);
                debug!(
                    url,
                    width = dimensions.width,
                    height = dimensions.height,
                    "Probed image"
                );
                dimensions
            }
            Ok(Err(e)) => {
                debug!(url, error = %e, "Image probe failed, using sentinel");
                Dimensions::SENTINEL
            }
            Err(_) => {
                debug!(
                    url,
                    after_ms = self.timeout.as_millis() as u64,
                    "Image probe timed out, using sentinel"
                );
                Dimensions::SENTINEL
            }
        }
    }

    /// Resolve every distinct URL in `urls` concurrently.
    pub async fn resolve_all<'a, I>(&self, urls: I) -> HashMap<String, Dimensions>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = urls.into_iter().filter(|url| seen.insert(*url)).collect();

        let resolved = join_all(unique.iter().map(|url| self.resolve(url))).await;
        unique
            .into_iter()
            .map(str::to_string)
            .zip(resolved)
            .collect()
    }

    /// Number of cached entries.
    pub fn cached_len(&self) -> usize {
        self.lock().len()
    }

    /// Drop every cached entry, in memory and in the attached store.
    pub fn clear(&self) -> usize {
        self.lock().clear()
    }

    /// Detach the durable store. The in-memory cache stays usable.
    pub fn close(&self) -> Option<Box<dyn KeyValueStore>> {
        self.lock().close()
    }

    fn lock(&self) -> MutexGuard<'_, DimensionCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
