//! Provider entity URLs
//!
//! MusicBrainz links external catalog pages to its entities by URL, so an
//! external ID has to be turned into the canonical page URL of its provider
//! before it can be looked up.

use crate::types::ExternalEntityId;
use reqwest::Url;
use std::collections::HashMap;
use thiserror::Error;

/// Placeholder for the provider-specific entity type
const TYPE_PLACEHOLDER: &str = "{type}";

/// Placeholder for the provider-specific ID
const ID_PLACEHOLDER: &str = "{id}";

/// Built-in provider URL templates
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("bandcamp", "https://{id}.bandcamp.com/"),
    ("beatport", "https://www.beatport.com/{type}/-/{id}"),
    ("deezer", "https://www.deezer.com/{type}/{id}"),
    ("itunes", "https://music.apple.com/{type}/{id}"),
    ("spotify", "https://open.spotify.com/{type}/{id}"),
    ("tidal", "https://tidal.com/{type}/{id}"),
];

/// Provider URL errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid {provider} entity URL: {reason}")]
    InvalidUrl { provider: String, reason: String },
}

/// Builds the canonical page URL of an external entity
pub trait EntityUrlBuilder: Send + Sync {
    fn construct_entity_url(&self, entity_id: &ExternalEntityId) -> Result<Url, ProviderError>;
}

/// URL templates keyed by lowercase provider name
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    templates: HashMap<String, String>,
}

impl ProviderRegistry {
    /// Registry with the built-in providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (provider, template) in DEFAULT_TEMPLATES {
            registry.register(provider, template);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Add or replace the template of a provider
    pub fn register(&mut self, provider: &str, template: &str) {
        self.templates
            .insert(provider.to_lowercase(), template.to_string());
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.templates.contains_key(&provider.to_lowercase())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EntityUrlBuilder for ProviderRegistry {
    fn construct_entity_url(&self, entity_id: &ExternalEntityId) -> Result<Url, ProviderError> {
        let template = self
            .templates
            .get(&entity_id.provider.to_lowercase())
            .ok_or_else(|| ProviderError::UnknownProvider(entity_id.provider.clone()))?;

        let url = template
            .replace(TYPE_PLACEHOLDER, &entity_id.entity_type)
            .replace(ID_PLACEHOLDER, &entity_id.id);

        Url::parse(&url).map_err(|e| ProviderError::InvalidUrl {
            provider: entity_id.provider.clone(),
            reason: format!("{}: {}", url, e),
        })
    }
}
