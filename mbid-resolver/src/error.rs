//! Error types for mbid-resolver
//!
//! Classified MusicBrainz errors never show up here: the resolver turns them
//! into negative results. What remains aborts the whole batch.

use crate::musicbrainz::MbError;
use crate::providers::ProviderError;
use thiserror::Error;

/// Resolution error
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Unclassified lookup failure (network, parse, bad request)
    #[error("MusicBrainz lookup failed: {0}")]
    Lookup(MbError),

    /// External ID could not be turned into a provider URL
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;
