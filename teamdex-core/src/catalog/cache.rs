//! Memoizing front for the catalog transport
//!
//! Parsed responses are kept by exact request key for the life of the
//! process. There is no expiry and no size cap: the catalog is read-only and
//! bounded (about a thousand detail documents plus one list envelope), so an
//! unbounded map is the intended design here rather than an omission.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::transport::CatalogTransport;
use crate::error::FetchError;

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct CatalogCache {
    transport: Arc<dyn CatalogTransport>,
    // Only locked for map access, never across an await.
    entries: Mutex<HashMap<String, Arc<serde_json::Value>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CatalogCache {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self {
            transport,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The transport this cache reads through
    pub fn transport(&self) -> Arc<dyn CatalogTransport> {
        Arc::clone(&self.transport)
    }

    /// Return the value for `key`, retrieving it on a miss.
    ///
    /// A hit performs no network access. Only successfully parsed values are
    /// stored; failures propagate as [`FetchError`] and leave the cache as is.
    pub async fn fetch_cached<T: DeserializeOwned>(&self, key: &str) -> Result<T, FetchError> {
        let cached = self.lock().get(key).cloned();
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit: {}", key);
            return decode(key, &value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss: {} (via {})", key, self.transport.name());

        let value = self.transport.get_json(key).await?;
        let parsed = decode(key, &value)?;
        self.lock().insert(key.to_string(), Arc::new(value));

        Ok(parsed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached response
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<serde_json::Value>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &serde_json::Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|e| FetchError::decode(key, e))
}
