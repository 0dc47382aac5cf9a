//! MusicBrainz URL entity response model
//!
//! Only the fields needed to pick the related entity are deserialized.

use crate::types::EntityType;
use serde::{Deserialize, Serialize};

/// URL entity with its relationships, as returned by `/ws/2/url`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UrlRelations {
    /// MBID of the URL entity itself
    #[serde(default)]
    pub id: String,
    /// The browsed URL
    #[serde(default)]
    pub resource: String,
    /// Relationships included by `inc=<type>-rels`
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl UrlRelations {
    /// Relationships whose target is an entity of `entity_type`
    ///
    /// The web service spells target types with underscores
    /// (`release_group`), so both spellings match.
    pub fn relations_of(&self, entity_type: EntityType) -> impl Iterator<Item = &Relation> {
        self.relations
            .iter()
            .filter(move |relation| relation.target_type.replace('_', "-") == entity_type.as_str())
    }
}

/// Relationship between the URL and another entity
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Relation {
    /// Type of the related entity, e.g. "artist" or "release-group"
    #[serde(rename = "target-type")]
    pub target_type: String,
    /// Relationship type, e.g. "free streaming"
    #[serde(rename = "type", default)]
    pub relation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<TargetEntity>,
    #[serde(
        rename = "release_group",
        alias = "release-group",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub release_group: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<TargetEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<TargetEntity>,
}

impl Relation {
    /// Embedded target entity of the given type
    pub fn target(&self, entity_type: EntityType) -> Option<&TargetEntity> {
        match entity_type {
            EntityType::Area => self.area.as_ref(),
            EntityType::Artist => self.artist.as_ref(),
            EntityType::Event => self.event.as_ref(),
            EntityType::Genre => self.genre.as_ref(),
            EntityType::Instrument => self.instrument.as_ref(),
            EntityType::Label => self.label.as_ref(),
            EntityType::Place => self.place.as_ref(),
            EntityType::Recording => self.recording.as_ref(),
            EntityType::Release => self.release.as_ref(),
            EntityType::ReleaseGroup => self.release_group.as_ref(),
            EntityType::Series => self.series.as_ref(),
            EntityType::Work => self.work.as_ref(),
        }
    }
}

/// Entity embedded in a relationship
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TargetEntity {
    /// MBID
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
