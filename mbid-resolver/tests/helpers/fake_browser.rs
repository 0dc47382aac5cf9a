//! Scripted `UrlBrowser` that counts lookups

use async_trait::async_trait;
use mbid_resolver::musicbrainz::{MbError, UrlBrowser, UrlRelations};
use mbid_resolver::types::EntityType;
use reqwest::Url;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted answer for one URL
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Relationship targets `(target type, mbid)`
    Relations(Vec<(&'static str, &'static str)>),
    /// Exactly one relationship
    Link(&'static str, String),
    /// 404 from the web service
    NotFound,
    /// Server-side failure
    ServerError,
    /// Connection failure
    NetworkDown,
}

/// Start or end of one lookup, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEvent {
    Started(String),
    Finished(String),
}

/// Fake MusicBrainz browser; unknown URLs answer with no relationships
#[derive(Default)]
pub struct FakeBrowser {
    responses: Mutex<HashMap<String, FakeResponse>>,
    calls: Mutex<Vec<(String, EntityType)>>,
    events: Mutex<Vec<LookupEvent>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, response: FakeResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    /// Shortcut for a URL linked to exactly one entity
    pub fn link(self, url: &str, target_type: &'static str, mbid: impl Into<String>) -> Self {
        self.respond(url, FakeResponse::Link(target_type, mbid.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, EntityType)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<LookupEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Highest number of lookups that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Position of an event in the event log
    pub fn position(&self, event: &LookupEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

#[async_trait]
impl UrlBrowser for FakeBrowser {
    async fn browse_url(
        &self,
        url: &Url,
        entity_type: EntityType,
    ) -> Result<UrlRelations, MbError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), entity_type));
        self.events
            .lock()
            .unwrap()
            .push(LookupEvent::Started(url.to_string()));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        // Let other lookups of the same group interleave
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(LookupEvent::Finished(url.to_string()));

        let response = self.responses.lock().unwrap().get(url.as_str()).cloned();
        let targets: Vec<(&str, String)> = match response {
            None => return Ok(UrlRelations::default()),
            Some(FakeResponse::Relations(targets)) => targets
                .into_iter()
                .map(|(target_type, mbid)| (target_type, mbid.to_string()))
                .collect(),
            Some(FakeResponse::Link(target_type, mbid)) => vec![(target_type, mbid)],
            Some(FakeResponse::NotFound) => return Err(MbError::NotFound),
            Some(FakeResponse::ServerError) => {
                return Err(MbError::Api(500, "Internal Server Error".to_string()))
            }
            Some(FakeResponse::NetworkDown) => {
                return Err(MbError::Network("connection refused".to_string()))
            }
        };

        let relations: Vec<_> = targets
            .iter()
            .map(|(target_type, mbid)| {
                let mut relation = Map::new();
                relation.insert("target-type".to_string(), json!(target_type));
                relation.insert("type".to_string(), json!("free streaming"));
                relation.insert(target_type.to_string(), json!({ "id": mbid }));
                Value::Object(relation)
            })
            .collect();

        Ok(serde_json::from_value(json!({
            "id": "url-mbid",
            "resource": url.as_str(),
            "relations": relations,
        }))
        .unwrap())
    }
}
