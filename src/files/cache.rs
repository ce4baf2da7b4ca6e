//! In-memory file cache.
//!
//! Entries are keyed by normalized request path and hold immutable
//! [`Bytes`]; readers always see a complete entry or none. There is no
//! eviction: an entry lives as long as the process once inserted.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the cache. Cloning is cheap and every clone sees the
/// same entries.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.read().await.get(key).cloned()
    }

    /// Inserts `bytes` unless `key` is already present, and returns the
    /// entry that ends up cached. The first writer wins a race.
    pub async fn put(&self, key: impl Into<String>, bytes: Bytes) -> Bytes {
        self.entries
            .write()
            .await
            .entry(key.into())
            .or_insert(bytes)
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Sum of the sizes of all cached entries.
    pub async fn total_bytes(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .map(Bytes::len)
            .sum()
    }
}
