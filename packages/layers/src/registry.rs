//! Compile-time catalog of map layers, basemaps and heatmap categories.
//!
//! Each layer is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a layer requires creating a TOML file in `catalog/layers/` and
//! adding a corresponding entry here.

use access_map_layers_models::{Basemap, HeatmapCategory, LayerDef};
use serde::Deserialize;

/// Number of catalog layers. Enforced by a test.
#[cfg(test)]
const EXPECTED_LAYER_COUNT: usize = 8;

/// Embedded layer definitions, in sidebar order.
const LAYER_TOMLS: &[(&str, &str)] = &[
    ("citylimits", include_str!("../catalog/layers/citylimits.toml")),
    (
        "neighbourhoods",
        include_str!("../catalog/layers/neighbourhoods.toml"),
    ),
    (
        "convenience_stores",
        include_str!("../catalog/layers/convenience_stores.toml"),
    ),
    (
        "grocery_stores",
        include_str!("../catalog/layers/grocery_stores.toml"),
    ),
    (
        "restaurants",
        include_str!("../catalog/layers/restaurants.toml"),
    ),
    (
        "emergency_food",
        include_str!("../catalog/layers/emergency_food.toml"),
    ),
    (
        "speciality_stores",
        include_str!("../catalog/layers/speciality_stores.toml"),
    ),
    (
        "transitstops",
        include_str!("../catalog/layers/transitstops.toml"),
    ),
];

const BASEMAPS_TOML: &str = include_str!("../catalog/basemaps.toml");

const HEATMAPS_TOML: &str = include_str!("../catalog/heatmaps.toml");

#[derive(Deserialize)]
struct BasemapFile {
    basemap: Vec<Basemap>,
}

#[derive(Deserialize)]
struct HeatmapFile {
    category: Vec<HeatmapCategory>,
}

/// Returns all catalog layers.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_layers() -> Vec<LayerDef> {
    LAYER_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse layer '{name}': {e}"))
        })
        .collect()
}

/// Looks up a catalog layer by id.
#[must_use]
pub fn layer(id: &str) -> Option<LayerDef> {
    all_layers().into_iter().find(|layer| layer.id == id)
}

/// Returns the selectable basemaps, default first.
///
/// # Panics
///
/// Panics if the embedded basemap TOML fails to parse.
#[must_use]
pub fn all_basemaps() -> Vec<Basemap> {
    toml::de::from_str::<BasemapFile>(BASEMAPS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse basemaps: {e}"))
        .basemap
}

/// Returns the heatmap categories.
///
/// # Panics
///
/// Panics if the embedded heatmap TOML fails to parse.
#[must_use]
pub fn all_heatmap_categories() -> Vec<HeatmapCategory> {
    toml::de::from_str::<HeatmapFile>(HEATMAPS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse heatmap categories: {e}"))
        .category
}
