//! Core Types for the MBID Resolver
//!
//! Release data as produced by upstream extraction. Artists and labels
//! carry external IDs from third-party catalogs and an optional MBID that
//! the resolver fills in place.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// External IDs and Entity Types
// ============================================================================

/// Reference to an entity in a third-party catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalEntityId {
    /// Provider name, e.g. "deezer"
    pub provider: String,
    /// Provider-specific entity type, e.g. "artist"
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Provider-specific ID
    pub id: String,
}

impl ExternalEntityId {
    pub fn new(
        provider: impl Into<String>,
        entity_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ExternalEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.entity_type, self.id)
    }
}

/// MusicBrainz entity types which can be the target of a URL relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Area,
    Artist,
    Event,
    Genre,
    Instrument,
    Label,
    Place,
    Recording,
    Release,
    ReleaseGroup,
    Series,
    Work,
}

impl EntityType {
    /// Name as used by the MusicBrainz web service
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Area => "area",
            EntityType::Artist => "artist",
            EntityType::Event => "event",
            EntityType::Genre => "genre",
            EntityType::Instrument => "instrument",
            EntityType::Label => "label",
            EntityType::Place => "place",
            EntityType::Recording => "recording",
            EntityType::Release => "release",
            EntityType::ReleaseGroup => "release-group",
            EntityType::Series => "series",
            EntityType::Work => "work",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity whose MBID can be resolved from its external IDs
///
/// The MBID is set at most once; an entity that already has one is never
/// looked up again.
pub trait ResolvableEntity {
    /// Current MBID, if any
    fn mbid(&self) -> Option<&str>;

    /// Store the resolved MBID
    fn set_mbid(&mut self, mbid: String);

    /// External IDs usable for resolution
    fn external_ids(&self) -> Option<&[ExternalEntityId]>;

    /// True when a non-empty MBID is present
    fn has_mbid(&self) -> bool {
        self.mbid().is_some_and(|mbid| !mbid.is_empty())
    }
}

// ============================================================================
// Release Data Model
// ============================================================================

/// Release with all entities that may need MBID resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<ArtistCreditName>,
    /// Global Trade Item Number (EAN/UPC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    #[serde(default)]
    pub media: Vec<Medium>,
    #[serde(default)]
    pub info: ReleaseInfo,
}

/// One credited artist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistCreditName {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credited_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<Vec<ExternalEntityId>>,
}

impl ArtistCreditName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_external_ids(mut self, ids: Vec<ExternalEntityId>) -> Self {
        self.external_ids = Some(ids);
        self
    }
}

impl ResolvableEntity for ArtistCreditName {
    fn mbid(&self) -> Option<&str> {
        self.mbid.as_deref()
    }

    fn set_mbid(&mut self, mbid: String) {
        self.mbid = Some(mbid);
    }

    fn external_ids(&self) -> Option<&[ExternalEntityId]> {
        self.external_ids.as_deref()
    }
}

/// Record label with optional catalog number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ids: Option<Vec<ExternalEntityId>>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_external_ids(mut self, ids: Vec<ExternalEntityId>) -> Self {
        self.external_ids = Some(ids);
        self
    }
}

impl ResolvableEntity for Label {
    fn mbid(&self) -> Option<&str> {
        self.mbid.as_deref()
    }

    fn set_mbid(&mut self, mbid: String) {
        self.mbid = Some(mbid);
    }

    fn external_ids(&self) -> Option<&[ExternalEntityId]> {
        self.external_ids.as_deref()
    }
}

/// Disc or other medium of a release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medium {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub tracklist: Vec<Track>,
}

/// Track number, either numeric or a vinyl-style label such as "A1"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackNumber {
    Number(u32),
    Text(String),
}

/// Track of a medium; track-level artists override the release artists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<TrackNumber>,
    /// Track duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<ArtistCreditName>>,
}

// ============================================================================
// Release Info and Messages
// ============================================================================

/// Processing information attached to a release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    #[serde(default)]
    pub messages: Vec<ProviderMessage>,
}

/// Severity of a release message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Debug,
    Info,
    Warning,
    Error,
}

/// Message logged while processing a release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ProviderMessage {
    pub fn debug(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Debug,
            text: text.into(),
            provider: None,
        }
    }
}
