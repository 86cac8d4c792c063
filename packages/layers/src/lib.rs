#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map layer catalog.
//!
//! Embeds the overlay layers, basemaps and heatmap categories, tracks which
//! layers are switched on, and builds the paint for neighbourhood fills and
//! amenity heatmaps.

pub mod paint;
pub mod registry;
pub mod visibility;

pub use access_map_layers_models as models;
pub use paint::{heatmap_paint, neighbourhood_name, stable_color};
pub use registry::{all_basemaps, all_heatmap_categories, all_layers, layer};
pub use visibility::LayerVisibility;
