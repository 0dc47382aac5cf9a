//! Batch-scoped context cache

use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache overlay shared by all resolutions of one batch
///
/// Holds positive results and negative sentinels for every external ID
/// that was looked up remotely during the batch, so its size equals the
/// number of remote requests.
#[derive(Debug, Default)]
pub struct ContextCache {
    entries: RwLock<HashMap<String, String>>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Insert or overwrite; concurrent writers of one key: last one wins
    pub async fn insert(&self, key: String, value: String) {
        self.entries.write().await.insert(key, value);
    }

    /// Number of distinct keys touched
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
