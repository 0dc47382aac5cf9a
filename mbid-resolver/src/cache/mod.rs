//! Two-tier MBID cache
//!
//! - [`ContextCache`]: overlay owned by one batch resolution, including
//!   negative results
//! - [`CacheGateway`]: key building, read-through of the overlay and the
//!   persistent [`KeyValueStore`](crate::store::KeyValueStore), and the
//!   evict-and-retry write path

pub mod context;
pub mod gateway;

pub use context::ContextCache;
pub use gateway::{cache_key, CacheGateway};

/// Prefix of every MBID cache key
pub const MBID_CACHE_PREFIX: &str = "mbid";

/// Separator between the parts of a cache key
pub const CACHE_KEY_SEPARATOR: &str = ":";

/// Value recording "looked up, not resolvable"
///
/// Only ever stored in a [`ContextCache`], never persisted.
pub const NEGATIVE_SENTINEL: &str = "";
