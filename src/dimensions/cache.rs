//! Bounded FIFO cache of image dimensions with a durable mirror.
//!
//! The in-memory map is authoritative. When a [`KeyValueStore`] is attached,
//! every insert is written through under `img_dim_<url>` and evicted keys are
//! removed from it, so the mirror never grows past the cache capacity.
//! Mirror failures are logged and otherwise ignored.

use super::store::KeyValueStore;
use crate::model::Dimensions;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Prefix of every mirrored key.
pub const KEY_PREFIX: &str = "img_dim_";

/// Capacity used when zero is requested.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Mirrored value. `seq` restores insertion order on reload.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedDimensions {
    width: u32,
    height: u32,
    #[serde(default)]
    seq: u64,
}

/// Store key for `url`.
pub fn store_key(url: &str) -> String {
    format!("{KEY_PREFIX}{url}")
}

/// URL → natural size, evicting the oldest insert when full.
pub struct DimensionCache {
    entries: HashMap<String, (Dimensions, u64)>,
    order: VecDeque<String>,
    max_entries: usize,
    next_seq: u64,
    store: Option<Box<dyn KeyValueStore>>,
}

impl std::fmt::Debug for DimensionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionCache")
            .field("len", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl DimensionCache {
    /// Empty, memory-only cache.
    ///
    /// If `max_entries` is 0, uses [`DEFAULT_MAX_ENTRIES`].
    pub fn new(max_entries: usize) -> Self {
        let max_entries = if max_entries == 0 {
            DEFAULT_MAX_ENTRIES
        } else {
            max_entries
        };
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
            next_seq: 0,
            store: None,
        }
    }

    /// Attach `store` and load every mirrored entry from it.
    ///
    /// Entries are replayed oldest first; if the store holds more than the
    /// capacity, the oldest are evicted from both. Malformed values are
    /// skipped. Returns the number of entries loaded.
    pub fn open(&mut self, store: Box<dyn KeyValueStore>) -> usize {
        let persisted = match store.entries_with_prefix(KEY_PREFIX) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Could not read persisted dimensions, starting cold");
                Vec::new()
            }
        };
        self.store = Some(store);

        let mut decoded: Vec<(String, PersistedDimensions)> = persisted
            .into_iter()
            .filter_map(|(key, value)| {
                let url = key.strip_prefix(KEY_PREFIX)?.to_string();
                match serde_json::from_str::<PersistedDimensions>(&value) {
                    Ok(dims) => Some((url, dims)),
                    Err(e) => {
                        debug!(key = %key, error = %e, "Skipping malformed cached dimensions");
                        None
                    }
                }
            })
            .collect();
        decoded.sort_by_key(|(_, dims)| dims.seq);

        let loaded = decoded.len();
        for (url, dims) in decoded {
            self.next_seq = self.next_seq.max(dims.seq + 1);
            self.remember(url, Dimensions::new(dims.width, dims.height), dims.seq);
        }

        debug!(loaded, kept = self.entries.len(), "Loaded persisted dimensions");
        loaded.min(self.max_entries)
    }

    /// Detach and return the store, if any.
    pub fn close(&mut self) -> Option<Box<dyn KeyValueStore>> {
        self.store.take()
    }

    /// Cached size of `url`.
    pub fn get(&self, url: &str) -> Option<Dimensions> {
        self.entries.get(url).map(|(dims, _)| *dims)
    }

    /// Whether `url` is cached.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Cache `dimensions` for `url` and mirror the write.
    ///
    /// Overwriting an existing URL keeps its original eviction position.
    pub fn insert(&mut self, url: &str, dimensions: Dimensions) {
        let seq = match self.entries.get(url) {
            Some((_, seq)) => *seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.remember(url.to_string(), dimensions, seq);

        let value = PersistedDimensions {
            width: dimensions.width,
            height: dimensions.height,
            seq,
        };
        if let Some(store) = self.store.as_mut() {
            let written = serde_json::to_string(&value)
                .map_err(Into::into)
                .and_then(|json| store.set(&store_key(url), &json));
            if let Err(e) = written {
                warn!(url, error = %e, "Failed to persist dimensions");
            }
        }
    }

    /// Remove every entry, including the mirrored ones.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.remove_prefix(KEY_PREFIX) {
                warn!(error = %e, "Failed to clear persisted dimensions");
            }
        }
        removed
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Whether a durable store is attached.
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    fn remember(&mut self, url: String, dimensions: Dimensions, seq: u64) {
        if let Some(slot) = self.entries.get_mut(&url) {
            *slot = (dimensions, seq);
            return;
        }

        while self.entries.len() >= self.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(url = %oldest, "Evicted cached dimensions");
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = store.remove(&store_key(&oldest)) {
                    warn!(url = %oldest, error = %e, "Failed to drop evicted dimensions");
                }
            }
        }

        self.order.push_back(url.clone());
        self.entries.insert(url, (dimensions, seq));
    }
}

impl Default for DimensionCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::store::MemoryStore;
    use crate::model::StoreError;
    use std::sync::{Arc, Mutex};

    /// Store whose contents stay inspectable after being boxed into a cache.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.lock().unwrap().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key)
        }
        fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
            self.0.lock().unwrap().entries_with_prefix(prefix)
        }
        fn remove_prefix(&mut self, prefix: &str) -> Result<usize, StoreError> {
            self.0.lock().unwrap().remove_prefix(prefix)
        }
    }

    fn url(i: usize) -> String {
        format!("https://img/{i}.jpg")
    }

    #[test]
    fn zero_capacity_uses_default() {
        assert_eq!(DimensionCache::new(0).max_entries(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn evicts_oldest_insert_first() {
        let mut cache = DimensionCache::new(500);
        for i in 0..501 {
            cache.insert(&url(i), Dimensions::new(100, 100));
        }

        assert_eq!(cache.len(), 500);
        assert!(!cache.contains(&url(0)), "first insert must be evicted");
        assert!(cache.contains(&url(1)));
        assert!(cache.contains(&url(500)));
    }

    #[test]
    fn reads_do_not_refresh_eviction_order() {
        let mut cache = DimensionCache::new(2);
        cache.insert("a", Dimensions::new(1, 2));
        cache.insert("b", Dimensions::new(3, 4));
        assert!(cache.get("a").is_some());
        cache.insert("c", Dimensions::new(5, 6));

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn mirror_follows_inserts_and_evictions() {
        let shared = SharedStore::default();
        let mut cache = DimensionCache::new(2);
        cache.open(Box::new(shared.clone()));

        cache.insert("a", Dimensions::new(1, 2));
        cache.insert("b", Dimensions::new(3, 4));
        cache.insert("c", Dimensions::new(5, 6));

        let keys: Vec<String> = shared
            .entries_with_prefix(KEY_PREFIX)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["img_dim_b".to_string(), "img_dim_c".to_string()]);
    }

    #[test]
    fn open_restores_entries_and_insertion_order() {
        let shared = SharedStore::default();
        {
            let mut cache = DimensionCache::new(3);
            cache.open(Box::new(shared.clone()));
            cache.insert("z-first", Dimensions::new(1, 1));
            cache.insert("a-second", Dimensions::new(2, 2));
            cache.close();
        }

        let mut reopened = DimensionCache::new(3);
        assert_eq!(reopened.open(Box::new(shared.clone())), 2);
        assert_eq!(reopened.get("a-second"), Some(Dimensions::new(2, 2)));

        reopened.insert("c", Dimensions::new(3, 3));
        reopened.insert("d", Dimensions::new(4, 4));
        assert!(
            !reopened.contains("z-first"),
            "oldest persisted entry is evicted first despite sorting last"
        );
    }

    #[test]
    fn open_skips_foreign_and_malformed_values() {
        let mut store = MemoryStore::new();
        store.set("img_dim_good", r#"{"width":4,"height":3}"#).unwrap();
        store.set("img_dim_bad", "not json").unwrap();
        store.set("unrelated", r#"{"width":1,"height":1}"#).unwrap();

        let mut cache = DimensionCache::new(10);
        assert_eq!(cache.open(Box::new(store)), 1);
        assert_eq!(cache.get("good"), Some(Dimensions::new(4, 3)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn full_store_degrades_to_memory_only() {
        let mut cache = DimensionCache::new(10);
        cache.open(Box::new(MemoryStore::with_quota(1)));

        cache.insert("a", Dimensions::new(1, 1));
        cache.insert("b", Dimensions::new(2, 2));

        assert_eq!(cache.get("b"), Some(Dimensions::new(2, 2)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties_cache_and_mirror() {
        let shared = SharedStore::default();
        let mut cache = DimensionCache::new(10);
        cache.open(Box::new(shared.clone()));
        cache.insert("a", Dimensions::new(1, 1));

        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
        assert!(shared.entries_with_prefix(KEY_PREFIX).unwrap().is_empty());
    }
}
