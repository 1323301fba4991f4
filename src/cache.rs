use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;

pub const DEFAULT_CAPACITY: usize = 300;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cache storage unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),
    #[error("cache data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence for dictionary results, oldest entry first.
pub trait CacheStore {
    fn load(&self) -> Result<Vec<(String, bool)>, StorageError>;
    fn save(&self, entries: &[(String, bool)]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::cache_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self) -> Result<Vec<(String, bool)>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, entries: &[(String, bool)]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Bounded word -> validity cache. Keys are case-insensitive and the oldest
/// insertion is evicted first once `capacity` is exceeded.
pub struct ResultCache {
    entries: HashMap<String, bool>,
    order: VecDeque<String>,
    capacity: usize,
    store: Option<Box<dyn CacheStore>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl ResultCache {
    /// Session-only cache.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            store: None,
        }
    }

    /// Cache backed by `store`. Unreadable or corrupt data starts the cache empty.
    pub fn load(capacity: usize, store: Box<dyn CacheStore>) -> Self {
        let mut cache = Self::in_memory(capacity);

        match store.load() {
            Ok(entries) => {
                for (word, valid) in entries {
                    cache.put(&word, valid);
                }
                debug!(entries = cache.len(), "loaded dictionary cache");
            }
            Err(e) => warn!(error = %e, "discarding dictionary cache"),
        }

        cache.store = Some(store);
        cache
    }

    pub fn get(&self, word: &str) -> Option<bool> {
        self.entries.get(&word.to_lowercase()).copied()
    }

    /// Record a result and persist the cache. Storage failures are logged
    /// and otherwise ignored; the in-memory entry is kept either way.
    pub fn insert(&mut self, word: &str, valid: bool) {
        self.put(word, valid);
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist dictionary cache");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, word: &str, valid: bool) {
        let key = word.to_lowercase();
        if self.entries.insert(key.clone(), valid).is_none() {
            self.order.push_back(key);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let snapshot: Vec<(String, bool)> = self
            .order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.clone(), *v)))
            .collect();
        store.save(&snapshot)
    }
}
