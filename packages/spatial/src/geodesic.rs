//! Geodesic buffer polygons.

use std::f64::consts::TAU;

use geo::{Coord, Intersects, LineString, Point, Polygon};
use geojson::{Feature, Geometry, JsonObject};

/// Mean Earth radius used for buffer construction, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Buffer radius used by the accessibility query.
pub const DEFAULT_BUFFER_RADIUS_M: f64 = 1000.0;

/// Vertex count used by the accessibility query.
pub const DEFAULT_BUFFER_STEPS: usize = 96;

/// Fewest steps that still enclose an area.
const MIN_STEPS: usize = 3;

/// Approximates a circle of `radius_m` meters around (`lng`, `lat`).
///
/// Sweeps the bearing over `0..2π` in `steps` increments and projects
/// each bearing with the spherical destination formula. The ring holds
/// `steps + 1` vertices; the last is an exact copy of the first.
/// `steps` below 3 is raised to 3, so `0`, `1` and `2` all yield a
/// four-vertex triangle rather than `steps + 1` vertices.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn geodesic_circle(lng: f64, lat: f64, radius_m: f64, steps: usize) -> Polygon<f64> {
    let steps = steps.max(MIN_STEPS);
    let center_lat = lat.to_radians();
    let center_lng = lng.to_radians();
    let angular = radius_m / EARTH_RADIUS_M;

    let mut coords: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let bearing = (i as f64) * TAU / (steps as f64);
            destination(center_lng, center_lat, angular, bearing)
        })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }

    Polygon::new(LineString::new(coords), vec![])
}

/// Point reached by travelling `angular` radians of arc from the centre
/// along `bearing`.
fn destination(center_lng: f64, center_lat: f64, angular: f64, bearing: f64) -> Coord<f64> {
    let sin_lat = center_lat
        .sin()
        .mul_add(angular.cos(), center_lat.cos() * angular.sin() * bearing.cos());
    let lat = sin_lat.asin();

    let y = bearing.sin() * angular.sin() * center_lat.cos();
    let x = center_lat.sin().mul_add(-lat.sin(), angular.cos());
    let lng = center_lng + y.atan2(x);

    Coord {
        x: lng.to_degrees(),
        y: lat.to_degrees(),
    }
}

/// Whether `point` lies inside `polygon`. Points on the boundary count as
/// inside.
#[must_use]
pub fn point_in_polygon(point: &Point<f64>, polygon: &Polygon<f64>) -> bool {
    polygon.intersects(point)
}

/// Wraps a buffer polygon as a `GeoJSON` feature with a `radius_m`
/// property, ready to hand to the map as a source.
#[must_use]
pub fn buffer_feature(polygon: &Polygon<f64>, radius_m: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("radius_m".to_string(), serde_json::json!(radius_m));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine};

    #[test]
    fn ring_has_steps_plus_one_closed_vertices() {
        let circle = geodesic_circle(0.0, 0.0, 1000.0, 8);
        let ring = &circle.exterior().0;
        assert_eq!(ring.len(), 9);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn vertices_sit_at_requested_radius() {
        let center = Point::new(-104.6189, 50.4452);
        let circle = geodesic_circle(center.x(), center.y(), 1000.0, 96);
        for coord in circle.exterior().coords() {
            let d = Haversine.distance(center, Point::from(*coord));
            assert!((d - 1000.0).abs() < 1.0, "vertex at {d} m");
        }
    }

    #[test]
    fn first_vertex_is_due_north() {
        let circle = geodesic_circle(10.0, 20.0, 5000.0, 16);
        let first = circle.exterior().0[0];
        assert!((first.x - 10.0).abs() < 1e-9);
        assert!(first.y > 20.0);
    }

    #[test]
    fn tiny_step_counts_are_raised() {
        for steps in 0..=3 {
            let circle = geodesic_circle(0.0, 0.0, 1000.0, steps);
            assert_eq!(circle.exterior().0.len(), 4, "steps = {steps}");
        }
    }

    #[test]
    fn containment_matches_buffer() {
        let circle = geodesic_circle(-104.6189, 50.4452, 1000.0, 64);
        assert!(point_in_polygon(&Point::new(-104.6189, 50.4452), &circle));
        assert!(point_in_polygon(&Point::new(-104.6150, 50.4460), &circle));
        assert!(!point_in_polygon(&Point::new(-104.5800, 50.4452), &circle));
    }

    #[test]
    fn buffer_feature_carries_radius() {
        let circle = geodesic_circle(0.0, 0.0, 250.0, 8);
        let feature = buffer_feature(&circle, 250.0);
        assert_eq!(
            feature.properties.as_ref().and_then(|p| p.get("radius_m")),
            Some(&serde_json::json!(250.0))
        );
        assert!(matches!(
            feature.geometry.map(|g| g.value),
            Some(geojson::Value::Polygon(_))
        ));
    }
}
