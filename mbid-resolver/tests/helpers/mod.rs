//! Test Helper Utilities
//!
//! Shared utilities for testing mbid-resolver

pub mod fake_browser;

pub use fake_browser::{FakeBrowser, FakeResponse, LookupEvent};

use mbid_common::config::CacheQuotaConfig;
use mbid_resolver::store::{MemoryStore, SqliteStore};
use mbid_resolver::types::ExternalEntityId;
use mbid_resolver::{CacheGateway, KeyValueStore, MbidResolver, ProviderRegistry};
use std::sync::Arc;
use tempfile::TempDir;

pub const QUEEN_MBID: &str = "0383dadf-2a4e-4d10-a46a-e9e041da8eb3";
pub const EMI_MBID: &str = "c029628b-6633-439e-bcee-ed02e8a338f7";
pub const OTHER_MBID: &str = "9c9f1380-2516-4fc9-a3e6-f9f61941d090";

pub fn deezer(entity_type: &str, id: &str) -> ExternalEntityId {
    ExternalEntityId::new("deezer", entity_type, id)
}

pub fn spotify(entity_type: &str, id: &str) -> ExternalEntityId {
    ExternalEntityId::new("spotify", entity_type, id)
}

/// Resolver over an in-memory store and the given fake browser
pub fn memory_resolver(browser: Arc<FakeBrowser>) -> (MbidResolver, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(CacheQuotaConfig::default()));
    let resolver = MbidResolver::new(
        CacheGateway::new(store.clone()),
        browser,
        Arc::new(ProviderRegistry::default()),
    );
    (resolver, store)
}

/// Resolver over a SQLite store in a temporary directory
///
/// Returns (TempDir, resolver, store) - TempDir must be kept alive for duration of test
pub async fn durable_resolver(
    browser: Arc<FakeBrowser>,
) -> (TempDir, MbidResolver, Arc<dyn KeyValueStore>) {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteStore::open(&temp_dir.path().join("mbid_cache.db"), CacheQuotaConfig::default())
            .await
            .unwrap(),
    );
    let resolver = MbidResolver::new(
        CacheGateway::new(store.clone()),
        browser,
        Arc::new(ProviderRegistry::default()),
    );
    (temp_dir, resolver, store)
}
