//! MusicBrainz web service client
//!
//! Rate limited to one request per configured interval, as required by the
//! MusicBrainz API terms.

use super::{MbError, UrlBrowser, UrlRelations};
use crate::types::EntityType;
use async_trait::async_trait;
use mbid_common::config::MusicBrainzConfig;
use reqwest::{StatusCode, Url};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new(config: &MusicBrainzConfig) -> Result<Self, MbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MbError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_ms)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the URL browse request: `{base}/url?resource=..&inc=<type>-rels&fmt=json`
    fn browse_request_url(&self, resource: &Url, entity_type: EntityType) -> Result<Url, MbError> {
        let include = format!("{}-rels", entity_type.as_str());

        Url::parse_with_params(
            &format!("{}/url", self.base_url),
            &[
                ("resource", resource.as_str()),
                ("inc", include.as_str()),
                ("fmt", "json"),
            ],
        )
        .map_err(|e| MbError::Request(format!("{}: {}", self.base_url, e)))
    }
}

#[async_trait]
impl UrlBrowser for MusicBrainzClient {
    async fn browse_url(
        &self,
        url: &Url,
        entity_type: EntityType,
    ) -> Result<UrlRelations, MbError> {
        let request_url = self.browse_request_url(url, entity_type)?;

        self.rate_limiter.wait().await;

        tracing::debug!(url = %url, entity_type = %entity_type, "Querying MusicBrainz API");

        let response = self
            .http_client
            .get(request_url)
            .send()
            .await
            .map_err(|e| MbError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(MbError::NotFound);
        }

        if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MbError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MbError::Api(status.as_u16(), error_text));
        }

        let relations: UrlRelations = response
            .json()
            .await
            .map_err(|e| MbError::Parse(e.to_string()))?;

        tracing::debug!(
            url = %url,
            relations = relations.relations.len(),
            "Retrieved URL relationships from MusicBrainz"
        );

        Ok(relations)
    }
}
