//! Session-scoped in-memory store

use super::{entry_size, KeyValueStore, StoreError};
use async_trait::async_trait;
use mbid_common::config::{CacheQuotaConfig, StorageMedium};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory store with an entry and byte quota
///
/// Keys enumerate in lexicographic order.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    quota: CacheQuotaConfig,
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    size_bytes: usize,
}

impl MemoryStore {
    pub fn new(quota: CacheQuotaConfig) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            quota,
        }
    }

    /// Total bytes of keys plus values currently stored
    pub async fn size_bytes(&self) -> usize {
        self.inner.read().await.size_bytes
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn medium(&self) -> StorageMedium {
        StorageMedium::Session
    }

    fn quota(&self) -> &CacheQuotaConfig {
        &self.quota
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        let existing = inner.entries.get(key).map(|old| entry_size(key, old));
        if existing.is_none() && inner.entries.len() >= self.quota.max_entries {
            return Err(StoreError::CapacityExceeded(format!(
                "{} entries stored (max {})",
                inner.entries.len(),
                self.quota.max_entries
            )));
        }

        let new_size = inner.size_bytes - existing.unwrap_or(0) + entry_size(key, value);
        if new_size > self.quota.max_bytes {
            return Err(StoreError::CapacityExceeded(format!(
                "{} bytes needed (max {})",
                new_size, self.quota.max_bytes
            )));
        }

        inner.entries.insert(key.to_string(), value.to_string());
        inner.size_bytes = new_size;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(old) = inner.entries.remove(key) {
            inner.size_bytes -= entry_size(key, &old);
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.entries.len())
    }

    async fn key_at(&self, index: usize) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.entries.keys().nth(index).cloned())
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let removed = inner.entries.len();
        inner.entries.clear();
        inner.size_bytes = 0;
        Ok(removed)
    }
}
