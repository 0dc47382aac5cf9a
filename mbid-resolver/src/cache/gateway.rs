//! Cache gateway: read-through overlay plus bounded persistent store

use super::{ContextCache, CACHE_KEY_SEPARATOR, MBID_CACHE_PREFIX};
use crate::store::KeyValueStore;
use crate::types::ExternalEntityId;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entries evicted before retrying a rejected write
const EVICTIONS_PER_RETRY: usize = 2;

/// Retries of a rejected write
const WRITE_RETRIES: u32 = 1;

/// Build the cache key of an external ID: `mbid:<provider>:<type>:<id>`
pub fn cache_key(entity_id: &ExternalEntityId) -> String {
    [
        MBID_CACHE_PREFIX,
        entity_id.provider.as_str(),
        entity_id.entity_type.as_str(),
        entity_id.id.as_str(),
    ]
    .join(CACHE_KEY_SEPARATOR)
}

/// Access point for cached MBIDs
///
/// Reads check the context cache first, then the persistent store. Store
/// failures never reach the caller: a failed read is a miss, a failed
/// write is logged and dropped.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KeyValueStore>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persistent store behind this gateway
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Look up the cached value for an external ID
    ///
    /// Returns the negative sentinel verbatim; callers have to tell it
    /// apart from `None`.
    pub async fn get(
        &self,
        entity_id: &ExternalEntityId,
        context: Option<&ContextCache>,
    ) -> Option<String> {
        let key = cache_key(entity_id);

        if let Some(context) = context {
            if let Some(value) = context.get(&key).await {
                return Some(value);
            }
        }

        match self.store.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                debug!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Record a value for an external ID
    ///
    /// The context cache (if any) always receives the value. The persistent
    /// store only receives non-empty values.
    pub async fn set(
        &self,
        entity_id: &ExternalEntityId,
        value: &str,
        context: Option<&ContextCache>,
    ) {
        let key = cache_key(entity_id);

        if let Some(context) = context {
            context.insert(key.clone(), value.to_string()).await;
        }

        if !value.is_empty() {
            self.persistent_write(&key, value).await;
        }
    }

    /// Write to the persistent store, evicting random entries when full
    async fn persistent_write(&self, key: &str, value: &str) {
        let mut retries_left = WRITE_RETRIES;

        loop {
            let error = match self.store.set(key, value).await {
                Ok(()) => return,
                Err(e) => e,
            };
            debug!(key = %key, error = %error, "Failed to cache item");

            if !error.is_capacity() {
                warn!(key = %key, error = %error, "Caching failed, dropping entry");
                return;
            }

            if retries_left == 0 {
                warn!(key = %key, "Caching of '{}' failed repeatedly", key);
                return;
            }
            retries_left -= 1;

            for _ in 0..EVICTIONS_PER_RETRY {
                self.delete_random_entry().await;
            }
        }
    }

    /// Delete one uniformly chosen entry; no-op on an empty store
    async fn delete_random_entry(&self) -> Option<String> {
        let count = match self.store.count().await {
            Ok(0) => return None,
            Ok(count) => count,
            Err(e) => {
                debug!(error = %e, "Cannot count cache entries for eviction");
                return None;
            }
        };

        let index = rand::thread_rng().gen_range(0..count);
        let key = match self.store.key_at(index).await {
            Ok(Some(key)) => key,
            Ok(None) => return None,
            Err(e) => {
                debug!(index, error = %e, "Cannot enumerate cache entry for eviction");
                return None;
            }
        };

        if let Err(e) = self.store.delete(&key).await {
            debug!(key = %key, error = %e, "Cache eviction failed");
            return None;
        }

        debug!(key = %key, "Evicted random cache entry");
        Some(key)
    }
}
