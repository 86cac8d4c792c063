#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial helpers for the accessibility query.
//!
//! Builds a geodesic buffer around a clicked point, loads point-of-interest
//! layers into an R-tree, and returns every amenity inside the buffer
//! ordered by great-circle distance from the click.

pub mod geodesic;

use geo::{BoundingRect, Distance, Haversine, Intersects, Point, Polygon};
use geojson::{Feature, FeatureCollection, JsonObject};
use rstar::{AABB, RTree, RTreeObject};
use serde::Serialize;
use thiserror::Error;

pub use geodesic::{
    DEFAULT_BUFFER_RADIUS_M, DEFAULT_BUFFER_STEPS, buffer_feature, geodesic_circle,
    point_in_polygon,
};

/// Property keys tried, in order, for an amenity's display name.
pub const NAME_KEYS: &[&str] = &["Name", "name", "store_name", "stop_name"];

/// Name used when none of [`NAME_KEYS`] is present.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Errors from reading point features.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The feature has no geometry.
    #[error("Feature has no geometry")]
    MissingGeometry,

    /// The geometry could not be converted.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] geojson::Error),

    /// The geometry is not a point.
    #[error("Expected a Point geometry, found {found}")]
    NotAPoint {
        /// Geometry type encountered.
        found: &'static str,
    },
}

/// Extracts the point location of `feature`.
///
/// # Errors
///
/// Returns a [`SpatialError`] if the feature has no geometry or the
/// geometry is not a point.
pub fn feature_point(feature: &Feature) -> Result<Point<f64>, SpatialError> {
    let geometry = feature
        .geometry
        .clone()
        .ok_or(SpatialError::MissingGeometry)?;
    let geometry: geo::Geometry<f64> = geometry.try_into()?;

    match geometry {
        geo::Geometry::Point(point) => Ok(point),
        other => Err(SpatialError::NotAPoint {
            found: geometry_kind(&other),
        }),
    }
}

const fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

/// Display name of an amenity from its properties.
///
/// Takes the first of [`NAME_KEYS`] holding a non-blank string or a
/// number, falling back to [`UNKNOWN_NAME`].
#[must_use]
pub fn amenity_name(properties: Option<&JsonObject>) -> String {
    properties
        .and_then(|props| {
            NAME_KEYS.iter().find_map(|key| match props.get(*key)? {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        })
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// A point layer to index.
#[derive(Debug, Clone, Copy)]
pub struct PointLayer<'a> {
    /// Catalog layer id (e.g. `"grocery-stores"`).
    pub id: &'a str,
    /// Human-readable label (e.g. `"Grocery Stores"`).
    pub label: &'a str,
    /// The layer's features.
    pub collection: &'a FeatureCollection,
}

/// An amenity point stored in the R-tree with its metadata.
struct AmenityEntry {
    layer_id: String,
    layer_label: String,
    name: String,
    point: Point<f64>,
}

impl RTreeObject for AmenityEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x(), self.point.y()])
    }
}

/// An amenity found inside a buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAmenity {
    /// Catalog layer id.
    pub layer_id: String,
    /// Layer label.
    pub layer_label: String,
    /// Amenity name.
    pub name: String,
    /// `[lng, lat]`.
    pub coords: [f64; 2],
    /// Great-circle distance from the query point, in meters.
    pub distance_m: f64,
}

/// R-tree over the amenity points of one or more layers.
pub struct AmenityIndex {
    tree: RTree<AmenityEntry>,
}

impl AmenityIndex {
    /// Indexes every point feature of `layers`. Features without a point
    /// geometry are skipped with a warning.
    #[must_use]
    pub fn from_layers(layers: &[PointLayer<'_>]) -> Self {
        let mut entries = Vec::new();

        for layer in layers {
            let mut skipped = 0_usize;
            for feature in &layer.collection.features {
                match feature_point(feature) {
                    Ok(point) => entries.push(AmenityEntry {
                        layer_id: layer.id.to_string(),
                        layer_label: layer.label.to_string(),
                        name: amenity_name(feature.properties.as_ref()),
                        point,
                    }),
                    Err(e) => {
                        skipped += 1;
                        log::trace!("Skipping feature in layer {}: {e}", layer.id);
                    }
                }
            }
            if skipped > 0 {
                log::warn!(
                    "Skipped {skipped} non-point features in layer {}",
                    layer.id
                );
            }
        }

        log::info!("Loaded {} amenities into spatial index", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed amenities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no amenities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Amenities inside `buffer`, nearest to `center` first.
    #[must_use]
    pub fn within(&self, buffer: &Polygon<f64>, center: Point<f64>) -> Vec<NearbyAmenity> {
        let Some(envelope) = compute_envelope(buffer) else {
            return Vec::new();
        };

        let mut found: Vec<NearbyAmenity> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| buffer.intersects(&entry.point))
            .map(|entry| NearbyAmenity {
                layer_id: entry.layer_id.clone(),
                layer_label: entry.layer_label.clone(),
                name: entry.name.clone(),
                coords: [entry.point.x(), entry.point.y()],
                distance_m: Haversine.distance(center, entry.point),
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.layer_id.cmp(&b.layer_id))
                .then_with(|| a.name.cmp(&b.name))
        });
        found
    }
}

/// Buffer plus the amenities found inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilityResult {
    /// Query point.
    pub center: Point<f64>,
    /// Buffer radius in meters.
    pub radius_m: f64,
    /// Geodesic buffer polygon.
    pub buffer: Polygon<f64>,
    /// Amenities inside the buffer, nearest first.
    pub amenities: Vec<NearbyAmenity>,
}

impl AccessibilityResult {
    /// Buffer as a `GeoJSON` feature.
    #[must_use]
    pub fn buffer_feature(&self) -> Feature {
        buffer_feature(&self.buffer, self.radius_m)
    }
}

/// Runs the accessibility query around `center`.
#[must_use]
pub fn accessibility_query(
    index: &AmenityIndex,
    center: Point<f64>,
    radius_m: f64,
    steps: usize,
) -> AccessibilityResult {
    let buffer = geodesic_circle(center.x(), center.y(), radius_m, steps);
    let amenities = index.within(&buffer, center);
    log::debug!(
        "Found {} amenities within {radius_m} m of ({}, {})",
        amenities.len(),
        center.x(),
        center.y()
    );

    AccessibilityResult {
        center,
        radius_m,
        buffer,
        amenities,
    }
}

/// Computes the bounding box envelope for a [`Polygon`].
fn compute_envelope(polygon: &Polygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon
        .bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
