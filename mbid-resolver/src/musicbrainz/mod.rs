//! MusicBrainz URL lookups
//!
//! Resolution browses the URL entity of an external catalog page and reads
//! the relationships attached to it. [`UrlBrowser`] is the seam between the
//! resolver and the web service so lookups can be replaced in tests.

pub mod client;
pub mod types;

pub use client::MusicBrainzClient;
pub use types::{Relation, TargetEntity, UrlRelations};

use crate::types::EntityType;
use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

/// MusicBrainz client errors
#[derive(Debug, Error)]
pub enum MbError {
    #[error("URL not found in MusicBrainz")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl MbError {
    /// Ordinary failure reported by the web service
    ///
    /// These mark a candidate as unresolvable. Every other error aborts
    /// the resolution.
    pub fn is_api_error(&self) -> bool {
        matches!(self, MbError::NotFound | MbError::RateLimited | MbError::Api(..))
    }
}

/// Lookup of a URL entity including its relationships to one entity type
#[async_trait]
pub trait UrlBrowser: Send + Sync {
    async fn browse_url(&self, url: &Url, entity_type: EntityType)
        -> Result<UrlRelations, MbError>;
}
