#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map layer catalog types.
//!
//! Defines the TOML schema for the overlay layers, basemaps and heatmap
//! categories shown on the accessibility map.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// What a layer draws.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    /// Polygon outlines (city limits, neighbourhoods).
    Boundary,
    /// Point amenities drawn as symbols.
    Point,
}

/// Marker symbol for a point layer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PointShape {
    /// Filled circle.
    Circle,
    /// Filled square.
    Square,
    /// Upward triangle.
    Triangle,
    /// Five-pointed star.
    Star,
    /// Hexagon.
    Hexagon,
    /// Bitmap loaded from [`LayerDef::image_path`].
    CustomImage,
}

impl PointShape {
    /// Relative icon size so the shapes read at a similar visual weight.
    #[must_use]
    pub const fn icon_scale(self) -> f64 {
        match self {
            Self::Star => 1.3,
            Self::Triangle | Self::Square => 0.9,
            Self::Circle | Self::Hexagon | Self::CustomImage => 1.0,
        }
    }
}

/// An overlay layer, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDef {
    /// Unique layer identifier (e.g., `"grocery-stores"`).
    pub id: String,
    /// Human-readable label (e.g., "Grocery Stores").
    pub label: String,
    /// Boundary or point layer.
    pub kind: LayerKind,
    /// `GeoJSON` endpoint for the layer's features.
    pub url: Option<String>,
    /// Marker colour as a CSS hex string.
    pub color: Option<String>,
    /// Marker symbol. Only set on point layers.
    pub shape: Option<PointShape>,
    /// Image for [`PointShape::CustomImage`].
    pub image_path: Option<String>,
}

impl LayerDef {
    /// Whether this is a point layer.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.kind == LayerKind::Point
    }

    /// Icon scale for the layer's marker, `1.0` if it has no shape.
    #[must_use]
    pub fn icon_scale(&self) -> f64 {
        self.shape.map_or(1.0, PointShape::icon_scale)
    }
}

/// A selectable basemap style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basemap {
    /// Display label (e.g., "Satellite").
    pub label: String,
    /// Style URL (e.g., `"mapbox://styles/mapbox/satellite-v9"`).
    pub style: String,
}

/// A point layer that can be shown as a density heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCategory {
    /// Id of the point layer the heatmap reads from.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Category colour as a CSS hex string.
    pub color: String,
    /// Marker symbol shown next to the toggle.
    pub shape: PointShape,
    /// One-line description.
    pub description: String,
}
