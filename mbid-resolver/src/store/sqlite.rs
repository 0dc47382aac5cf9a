//! Durable SQLite store
//!
//! Entries live in the `mbid_cache` table created by
//! [`mbid_common::db::init_database`]. Enumeration follows rowid order,
//! which is insertion order for keys that were never deleted.
//!
//! Writes are serialized through one in-process lock. A deferred SQLite
//! transaction that reads before writing fails with `SQLITE_BUSY` instead
//! of waiting when another connection upgrades first.

use super::{entry_size, KeyValueStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use mbid_common::config::{CacheQuotaConfig, StorageMedium};
use sqlx::SqlitePool;
use std::path::Path;
use tokio::sync::Mutex;

/// Byte size of an entry as SQLite sees it (UTF-8 lengths)
const ENTRY_SIZE_SQL: &str = "length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))";

/// SQLite-backed store with an entry and byte quota
pub struct SqliteStore {
    pool: SqlitePool,
    quota: CacheQuotaConfig,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`
    pub async fn open(db_path: &Path, quota: CacheQuotaConfig) -> mbid_common::Result<Self> {
        let pool = mbid_common::db::init_database(db_path).await?;
        Ok(Self::new(pool, quota))
    }

    /// Wrap an initialized pool
    pub fn new(pool: SqlitePool, quota: CacheQuotaConfig) -> Self {
        Self {
            pool,
            quota,
            write_lock: Mutex::new(()),
        }
    }

    /// Total bytes of keys plus values currently stored
    pub async fn size_bytes(&self) -> Result<usize, StoreError> {
        let size: i64 = sqlx::query_scalar(&format!(
            "SELECT COALESCE(SUM({}), 0) FROM mbid_cache",
            ENTRY_SIZE_SQL
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(size as usize)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn medium(&self) -> StorageMedium {
        StorageMedium::Durable
    }

    fn quota(&self) -> &CacheQuotaConfig {
        &self.quota
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM mbid_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Held until commit or rollback: quota check and upsert are one step
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT {} FROM mbid_cache WHERE key = ?",
            ENTRY_SIZE_SQL
        ))
        .bind(key)
        .fetch_optional(&mut *tx)
        .await?;

        let (count, size_bytes): (i64, i64) = sqlx::query_as(&format!(
            "SELECT COUNT(*), COALESCE(SUM({}), 0) FROM mbid_cache",
            ENTRY_SIZE_SQL
        ))
        .fetch_one(&mut *tx)
        .await?;

        if existing.is_none() && count as usize >= self.quota.max_entries {
            return Err(StoreError::CapacityExceeded(format!(
                "{} entries stored (max {})",
                count, self.quota.max_entries
            )));
        }

        let new_size =
            size_bytes as usize - existing.unwrap_or(0) as usize + entry_size(key, value);
        if new_size > self.quota.max_bytes {
            return Err(StoreError::CapacityExceeded(format!(
                "{} bytes needed (max {})",
                new_size, self.quota.max_bytes
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO mbid_cache (key, value, cached_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, cached_at = excluded.cached_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        sqlx::query("DELETE FROM mbid_cache WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mbid_cache")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }

    async fn key_at(&self, index: usize) -> Result<Option<String>, StoreError> {
        let key: Option<String> =
            sqlx::query_scalar("SELECT key FROM mbid_cache ORDER BY rowid LIMIT 1 OFFSET ?")
                .bind(index as i64)
                .fetch_optional(&self.pool)
                .await?;

        Ok(key)
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM mbid_cache")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}
