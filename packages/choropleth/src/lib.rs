#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Statistical classification and choropleth styling.
//!
//! Turns one numeric property of a demographic `GeoJSON` layer into
//! everything the map needs to draw a choropleth:
//!
//! 1. [`jenks::jenks_breaks`] (or [`quantile::quantile_breaks`]) picks
//!    class breakpoints.
//! 2. [`ranges::ranges_from_breaks`] turns them into `[a, b]`, `(b, c]`,
//!    … intervals.
//! 3. [`expression::build_color_expression`] emits the renderer's
//!    fill-colour rule.
//! 4. [`legend::build_legend`] emits the legend from the same ranges and
//!    palette, so the two can never disagree.
//!
//! [`classify::classify`] runs the whole pipeline, skipping the `-99`
//! no-data sentinel and non-numeric values, and attaches a per-class
//! audit. [`session::ChoroplethSession`] caches the source collection and
//! the active result.

pub mod classify;
pub mod expression;
pub mod format;
pub mod jenks;
pub mod legend;
pub mod quantile;
pub mod ranges;
pub mod session;

use std::path::Path;

use geojson::{FeatureCollection, GeoJson};
use thiserror::Error;

pub use access_map_choropleth_models as models;
pub use classify::classify;
pub use format::format_num;
pub use jenks::jenks_breaks;

/// Errors from loading demographic data.
#[derive(Debug, Error)]
pub enum ChoroplethError {
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The input is valid `GeoJSON` but not a feature collection.
    #[error("Expected a FeatureCollection or Feature, found {found}")]
    NotFeatureCollection {
        /// `GeoJSON` object type encountered.
        found: &'static str,
    },
}

/// Parses a `GeoJSON` document into a feature collection.
///
/// A lone `Feature` is wrapped into a one-element collection.
///
/// # Errors
///
/// * [`ChoroplethError::GeoJson`] if the text is not valid `GeoJSON`
/// * [`ChoroplethError::NotFeatureCollection`] for a bare geometry
pub fn load_feature_collection(text: &str) -> Result<FeatureCollection, ChoroplethError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => Err(ChoroplethError::NotFeatureCollection { found: "Geometry" }),
    }
}

/// Reads and parses a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`ChoroplethError::Io`] if the file cannot be read, otherwise
/// the errors of [`load_feature_collection`].
pub fn load_feature_collection_file(path: &Path) -> Result<FeatureCollection, ChoroplethError> {
    let text = std::fs::read_to_string(path)?;
    let collection = load_feature_collection(&text)?;
    log::info!(
        "Loaded {} features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": null, "properties": { "pop": "12" } },
                { "type": "Feature", "geometry": null, "properties": { "pop": -99 } }
            ]
        }"#;
        let collection = load_feature_collection(text).unwrap();
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn wraps_single_feature() {
        let text = r#"{ "type": "Feature", "geometry": null, "properties": { "pop": 3 } }"#;
        assert_eq!(load_feature_collection(text).unwrap().features.len(), 1);
    }

    #[test]
    fn rejects_bare_geometry() {
        let text = r#"{ "type": "Point", "coordinates": [-104.6, 50.45] }"#;
        assert!(matches!(
            load_feature_collection(text),
            Err(ChoroplethError::NotFeatureCollection { found: "Geometry" })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            load_feature_collection("{ not json"),
            Err(ChoroplethError::GeoJson(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_feature_collection_file(Path::new("/nonexistent/demographics.geojson")),
            Err(ChoroplethError::Io(_))
        ));
    }
}
