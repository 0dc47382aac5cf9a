//! Release-wide MBID resolution

use super::MbidResolver;
use crate::cache::ContextCache;
use crate::error::ResolveResult;
use crate::types::{EntityType, ProviderMessage, Release, ResolvableEntity};
use futures::future::try_join_all;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one release-wide resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub elapsed: Duration,
    /// Distinct external IDs looked up remotely
    pub request_count: usize,
}

impl MbidResolver {
    /// Fill in missing MBIDs of all artists and labels of a release
    ///
    /// Groups (release artists, labels, then the artists of each track) are
    /// processed one after the other; entities within a group concurrently.
    /// A diagnostic message is appended to the release on success.
    pub async fn resolve_release_mbids(&self, release: &mut Release) -> ResolveResult<BatchReport> {
        let start = Instant::now();
        let context = ContextCache::new();

        self.resolve_group(&mut release.artists, EntityType::Artist, &context)
            .await?;

        if let Some(labels) = release.labels.as_mut() {
            self.resolve_group(labels, EntityType::Label, &context).await?;
        }

        for medium in &mut release.media {
            for track in &mut medium.tracklist {
                if let Some(artists) = track.artists.as_mut() {
                    self.resolve_group(artists, EntityType::Artist, &context)
                        .await?;
                }
            }
        }

        let report = BatchReport {
            elapsed: start.elapsed(),
            request_count: context.len().await,
        };

        release.info.messages.push(ProviderMessage::debug(format!(
            "Resolving external IDs to MBIDs took {} ms and {} API requests",
            report.elapsed.as_millis(),
            report.request_count
        )));

        info!(
            title = %release.title,
            elapsed_ms = report.elapsed.as_millis() as u64,
            requests = report.request_count,
            "Resolved release MBIDs"
        );

        Ok(report)
    }

    /// Resolve all entities of one group concurrently
    async fn resolve_group<E: ResolvableEntity>(
        &self,
        entities: &mut [E],
        entity_type: EntityType,
        context: &ContextCache,
    ) -> ResolveResult<()> {
        try_join_all(
            entities
                .iter_mut()
                .map(|entity| self.resolve_entity(entity, entity_type, context)),
        )
        .await?;

        Ok(())
    }

    async fn resolve_entity<E: ResolvableEntity>(
        &self,
        entity: &mut E,
        entity_type: EntityType,
        context: &ContextCache,
    ) -> ResolveResult<()> {
        if entity.has_mbid() {
            return Ok(());
        }

        let Some(external_ids) = entity.external_ids() else {
            return Ok(());
        };

        let resolved = self
            .resolve_to_mbid(external_ids, entity_type, Some(context))
            .await?;

        match resolved {
            Some(mbid) => entity.set_mbid(mbid),
            None => debug!(entity_type = %entity_type, "Entity left without MBID"),
        }

        Ok(())
    }
}
