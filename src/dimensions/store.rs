//! Synchronous string key-value stores backing the dimension cache mirror.

use crate::model::StoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable string store with prefix scans.
///
/// Any embedded persistence satisfies this; writes are synchronous so the
/// caller knows immediately whether the record landed.
pub trait KeyValueStore: Send {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` if present.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every `(key, value)` pair whose key starts with `prefix`.
    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Remove every key starting with `prefix`, returning how many were removed.
    fn remove_prefix(&mut self, prefix: &str) -> Result<usize, StoreError>;
}

fn matching<'a>(
    entries: &'a BTreeMap<String, String>,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
    entries
        .range(prefix.to_string()..)
        .take_while(move |(key, _)| key.starts_with(prefix))
}

/// In-memory store with an optional key quota.
///
/// Exceeding the quota fails the write the way a full browser storage
/// would; used for tests and as the fallback when no cache file is wanted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects new keys once `quota` keys are held.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if !self.entries.contains_key(key) && self.entries.len() >= quota {
                return Err(StoreError::QuotaExceeded { quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        Ok(matching(&self.entries, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn remove_prefix(&mut self, prefix: &str) -> Result<usize, StoreError> {
        let keys: Vec<String> = matching(&self.entries, prefix)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            self.entries.remove(key);
        }
        Ok(keys.len())
    }
}

/// Store persisted as one JSON object file, written through on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing contents.
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "No cache file yet, starting empty");
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let entries = match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file is corrupt, ignoring it");
                BTreeMap::new()
            }
        };

        Ok(Self { path, entries })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        Ok(matching(&self.entries, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn remove_prefix(&mut self, prefix: &str) -> Result<usize, StoreError> {
        let keys: Vec<String> = matching(&self.entries, prefix)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            self.entries.remove(key);
        }
        if !keys.is_empty() {
            self.persist()?;
        }
        Ok(keys.len())
    }
}
