//! Bounded key-value stores backing the persistent MBID cache
//!
//! Two mediums implement [`KeyValueStore`]:
//! - [`MemoryStore`]: session-scoped, dropped with the process
//! - [`SqliteStore`]: durable, kept in the root folder database
//!
//! Both enforce a [`CacheQuotaConfig`] and reject writes that would exceed
//! it with [`StoreError::CapacityExceeded`]. Reclaiming space is left to the
//! caller.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use mbid_common::config::{CacheQuotaConfig, StorageMedium};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Write rejected because the store is full
    #[error("Storage quota exceeded: {0}")]
    CapacityExceeded(String),

    /// Backing medium failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_capacity(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Bounded string-keyed store
///
/// Enumeration order (`key_at`) is stable between writes but otherwise
/// unspecified.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Backing medium of this store
    fn medium(&self) -> StorageMedium;

    /// Capacity quota enforced on writes
    fn quota(&self) -> &CacheQuotaConfig;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a value; fails with `CapacityExceeded` when full
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Number of stored entries
    async fn count(&self) -> Result<usize, StoreError>;

    /// Key at `index` in enumeration order
    async fn key_at(&self, index: usize) -> Result<Option<String>, StoreError>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        while let Some(key) = self.key_at(0).await? {
            self.delete(&key).await?;
            removed += 1;
        }
        Ok(removed)
    }
}

/// Open the store for the selected medium
pub async fn open_store(
    medium: StorageMedium,
    root_folder: &Path,
    quota: CacheQuotaConfig,
) -> mbid_common::Result<Arc<dyn KeyValueStore>> {
    quota.validate()?;

    let store: Arc<dyn KeyValueStore> = match medium {
        StorageMedium::Session => Arc::new(MemoryStore::new(quota)),
        StorageMedium::Durable => {
            let db_path = mbid_common::config::database_path(root_folder);
            Arc::new(SqliteStore::open(&db_path, quota).await?)
        }
    };

    info!(
        medium = %medium,
        max_entries = store.quota().max_entries,
        max_bytes = store.quota().max_bytes,
        "MBID cache store opened"
    );

    Ok(store)
}

/// Bytes an entry counts against the quota
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
