//! mbid-resolver library interface
//!
//! Resolves external catalog IDs (Deezer, Spotify, ...) attached to the
//! artists and labels of a release into MusicBrainz IDs, backed by a
//! two-tier cache.

pub mod cache;
pub mod error;
pub mod musicbrainz;
pub mod providers;
pub mod resolver;
pub mod store;
pub mod types;

pub use crate::cache::{CacheGateway, ContextCache};
pub use crate::error::{ResolveError, ResolveResult};
pub use crate::musicbrainz::{MbError, MusicBrainzClient, UrlBrowser};
pub use crate::providers::{EntityUrlBuilder, ProviderRegistry};
pub use crate::resolver::{BatchReport, MbidResolver};
pub use crate::store::{open_store, KeyValueStore, StoreError};
