//! Owned cache for the demographics layer.
//!
//! A [`ChoroplethSession`] holds the feature collection for the current
//! source and the classification for the currently selected field.
//! Invalidation rules:
//!
//! * switching to a different source drops the cached result and
//!   reclassifies the selected field against the new data;
//! * selecting or clearing a field replaces the result;
//! * every request carries a generation token, and only the latest
//!   request may publish its result (last request wins).

use std::sync::Arc;

use access_map_choropleth_models::{ChoroplethResult, ClassifyOptions};
use geojson::FeatureCollection;

use crate::classify::classify;

/// Identifies one classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    field: Option<String>,
}

impl RequestToken {
    /// Field requested, or `None` for a clear.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[derive(Debug)]
struct CachedSource {
    id: String,
    collection: Arc<FeatureCollection>,
}

/// Demographics source cache plus the active classification.
#[derive(Debug)]
pub struct ChoroplethSession {
    options: ClassifyOptions,
    source: Option<CachedSource>,
    selected: Option<String>,
    current: Option<ChoroplethResult>,
    generation: u64,
}

impl ChoroplethSession {
    /// Creates an empty session.
    #[must_use]
    pub const fn new(options: ClassifyOptions) -> Self {
        Self {
            options,
            source: None,
            selected: None,
            current: None,
            generation: 0,
        }
    }

    /// Classification options in effect.
    #[must_use]
    pub const fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Identifier of the cached source, if one is loaded.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.id.as_str())
    }

    /// The cached feature collection, if one is loaded.
    #[must_use]
    pub fn collection(&self) -> Option<Arc<FeatureCollection>> {
        self.source.as_ref().map(|s| Arc::clone(&s.collection))
    }

    /// Currently selected field.
    #[must_use]
    pub fn selected_field(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Classification for the selected field, if computed.
    #[must_use]
    pub const fn current(&self) -> Option<&ChoroplethResult> {
        self.current.as_ref()
    }

    /// Caches `collection` under `id`.
    ///
    /// Re-setting the same `id` keeps the existing collection and result
    /// and returns `false`. A new `id` invalidates the result, reclassifies
    /// the selected field (if any), and returns `true`.
    pub fn set_source(&mut self, id: &str, collection: Arc<FeatureCollection>) -> bool {
        if self.source_id() == Some(id) {
            return false;
        }

        log::debug!(
            "Caching demographics source '{id}' ({} features)",
            collection.features.len()
        );
        self.source = Some(CachedSource {
            id: id.to_string(),
            collection,
        });

        let field = self.selected.clone();
        self.select_field(field.as_deref());
        true
    }

    /// Drops the cached source and any classification.
    pub fn clear_source(&mut self) {
        self.source = None;
        self.current = None;
        self.generation += 1;
    }

    /// Selects `field` (or clears the selection with `None`) and
    /// classifies synchronously against the cached source.
    pub fn select_field(&mut self, field: Option<&str>) -> Option<&ChoroplethResult> {
        let token = self.begin_request(field);
        let result = match (token.field(), &self.source) {
            (Some(field), Some(source)) => Some(classify(field, &source.collection, &self.options)),
            _ => None,
        };
        self.finish_request(&token, result);
        self.current.as_ref()
    }

    /// Starts a request for `field`, superseding any request in flight.
    /// The previous result is dropped immediately.
    pub fn begin_request(&mut self, field: Option<&str>) -> RequestToken {
        self.generation += 1;
        self.selected = field.map(str::to_string);
        self.current = None;
        RequestToken {
            generation: self.generation,
            field: self.selected.clone(),
        }
    }

    /// Publishes `result` for `token`. Returns `false` and discards the
    /// result if a newer request has started since.
    pub fn finish_request(&mut self, token: &RequestToken, result: Option<ChoroplethResult>) -> bool {
        if token.generation != self.generation {
            log::debug!(
                "Discarding stale classification for {:?} (generation {} < {})",
                token.field,
                token.generation,
                self.generation
            );
            return false;
        }
        self.current = result;
        true
    }
}

impl Default for ChoroplethSession {
    fn default() -> Self {
        Self::new(ClassifyOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Feature;
    use serde_json::{Map, Value, json};

    fn collection(values: &[Value]) -> Arc<FeatureCollection> {
        let features = values
            .iter()
            .map(|v| {
                let mut properties = Map::new();
                properties.insert("pop".to_string(), v.clone());
                Feature {
                    bbox: None,
                    geometry: None,
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();
        Arc::new(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    #[test]
    fn selecting_without_source_yields_nothing() {
        let mut session = ChoroplethSession::default();
        assert!(session.select_field(Some("pop")).is_none());
        assert_eq!(session.selected_field(), Some("pop"));
    }

    #[test]
    fn source_change_reclassifies_selected_field() {
        let mut session = ChoroplethSession::default();
        session.set_source("a", collection(&[json!(1), json!(2)]));
        session.select_field(Some("pop"));
        assert!(session.current().is_some_and(|r| !r.is_empty()));

        assert!(session.set_source("b", collection(&[json!(-99)])));
        assert_eq!(session.source_id(), Some("b"));
        assert!(session.current().is_some_and(ChoroplethResult::is_empty));
    }

    #[test]
    fn same_source_id_is_not_reloaded() {
        let mut session = ChoroplethSession::default();
        session.set_source("a", collection(&[json!(1), json!(2)]));
        session.select_field(Some("pop"));
        let before = session.current().cloned();

        assert!(!session.set_source("a", collection(&[json!(-99)])));
        assert_eq!(session.current().cloned(), before);
    }

    #[test]
    fn clearing_field_drops_result() {
        let mut session = ChoroplethSession::default();
        session.set_source("a", collection(&[json!(1), json!(2)]));
        session.select_field(Some("pop"));
        assert!(session.select_field(None).is_none());
        assert_eq!(session.selected_field(), None);
    }

    #[test]
    fn stale_request_cannot_overwrite_newer_one() {
        let mut session = ChoroplethSession::default();
        let data = collection(&[json!(1), json!(5), json!(9)]);
        session.set_source("a", Arc::clone(&data));

        let first = session.begin_request(Some("pop"));
        let second = session.begin_request(Some("pop"));

        let options = session.options().clone();
        let newer = classify("pop", &data, &options);
        assert!(session.finish_request(&second, Some(newer.clone())));

        let older = ChoroplethResult::Empty {
            field: "pop".to_string(),
        };
        assert!(!session.finish_request(&first, Some(older)));
        assert_eq!(session.current(), Some(&newer));
    }

    #[test]
    fn clearing_source_invalidates_pending_requests() {
        let mut session = ChoroplethSession::default();
        session.set_source("a", collection(&[json!(1)]));
        let token = session.begin_request(Some("pop"));
        session.clear_source();
        assert!(!session.finish_request(&token, None));
        assert!(session.collection().is_none());
    }
}
