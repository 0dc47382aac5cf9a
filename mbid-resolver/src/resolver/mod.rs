//! MBID resolution
//!
//! [`MbidResolver::resolve_to_mbid`] resolves one entity from its external
//! IDs; [`MbidResolver::resolve_release_mbids`] (in `batch`) walks a whole
//! release with one shared context cache.
//!
//! Per entity, candidates are first checked against the cache in input
//! order. Only candidates without any cache entry are looked up remotely,
//! still in input order, stopping at the first URL that is linked to
//! exactly one entity of the wanted type.

pub mod batch;

pub use batch::BatchReport;

use crate::cache::{CacheGateway, ContextCache, NEGATIVE_SENTINEL};
use crate::error::{ResolveError, ResolveResult};
use crate::musicbrainz::{UrlBrowser, UrlRelations};
use crate::providers::EntityUrlBuilder;
use crate::types::{EntityType, ExternalEntityId};
use std::sync::Arc;
use tracing::debug;

/// Resolves external entity IDs to MusicBrainz IDs
#[derive(Clone)]
pub struct MbidResolver {
    cache: CacheGateway,
    browser: Arc<dyn UrlBrowser>,
    urls: Arc<dyn EntityUrlBuilder>,
}

impl MbidResolver {
    pub fn new(
        cache: CacheGateway,
        browser: Arc<dyn UrlBrowser>,
        urls: Arc<dyn EntityUrlBuilder>,
    ) -> Self {
        Self {
            cache,
            browser,
            urls,
        }
    }

    pub fn cache(&self) -> &CacheGateway {
        &self.cache
    }

    /// Resolve the MBID of an entity of `entity_type` from its external IDs
    ///
    /// Returns `Ok(None)` when no candidate leads to a unique entity.
    /// Unresolvable candidates are remembered in `context` only.
    pub async fn resolve_to_mbid(
        &self,
        external_ids: &[ExternalEntityId],
        entity_type: EntityType,
        context: Option<&ContextCache>,
    ) -> ResolveResult<Option<String>> {
        if external_ids.is_empty() {
            return Ok(None);
        }

        let mut unchecked = Vec::with_capacity(external_ids.len());
        for entity_id in external_ids {
            match self.cache.get(entity_id, context).await {
                Some(mbid) if !mbid.is_empty() => {
                    debug!(entity_type = %entity_type, mbid = %mbid, id = %entity_id, "Cached MBID");
                    return Ok(Some(mbid));
                }
                // Known to be unresolvable
                Some(_) => continue,
                None => unchecked.push(entity_id),
            }
        }

        for entity_id in unchecked {
            let url = self.urls.construct_entity_url(entity_id)?;

            match self.browser.browse_url(&url, entity_type).await {
                Ok(relations) => {
                    if let Some(mbid) = unique_target(&relations, entity_type) {
                        debug!(entity_type = %entity_type, mbid = %mbid, url = %url, "Resolved");
                        self.cache.set(entity_id, &mbid, context).await;
                        return Ok(Some(mbid));
                    }
                    debug!(entity_type = %entity_type, url = %url, "No unique MBID for URL");
                }
                Err(e) if e.is_api_error() => {
                    debug!(entity_type = %entity_type, url = %url, error = %e, "URL lookup failed");
                }
                Err(e) => return Err(ResolveError::Lookup(e)),
            }

            self.cache.set(entity_id, NEGATIVE_SENTINEL, context).await;
        }

        Ok(None)
    }
}

/// MBID of the only related entity of `entity_type`, if there is exactly one
fn unique_target(relations: &UrlRelations, entity_type: EntityType) -> Option<String> {
    let mut matching = relations.relations_of(entity_type);
    let relation = matching.next()?;
    if matching.next().is_some() {
        return None;
    }

    relation
        .target(entity_type)
        .map(|target| target.id.clone())
        .filter(|id| !id.is_empty())
}
