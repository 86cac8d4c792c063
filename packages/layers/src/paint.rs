//! Paint properties for the neighbourhood fill and the amenity heatmaps.

use access_map_layers_models::HeatmapCategory;
use access_map_style::Expression;
use serde::Serialize;
use serde_json::{Map, Value};

/// Property keys tried, in order, for a neighbourhood's name. Boundary
/// files from different sources disagree on the column name.
pub const NEIGHBOURHOOD_NAME_KEYS: &[&str] = &[
    "Boundary_Name",
    "BOUNDARY_NAME",
    "BOUNDARY_N",
    "NSA_NA",
    "NSA_NAME",
    "Name",
    "NAME",
    "name",
    "neighbourhood",
    "neighborhood",
    "NB_NAME",
    "NBNAME",
];

/// Name used when no key holds a value.
pub const UNKNOWN_NEIGHBOURHOOD: &str = "Unknown";

/// Feature property the neighbourhood fill colour is read from.
pub const FILL_COLOR_PROPERTY: &str = "fillClr";

/// Pastel colour derived from `name`.
///
/// The same name always maps to the same colour so neighbourhoods keep
/// their colours across reloads. Hashes UTF-16 code units with 32-bit
/// wrapping arithmetic and uses the result as the hue.
#[must_use]
pub fn stable_color(name: &str) -> String {
    let hash = name
        .encode_utf16()
        .fold(0_i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    format!("hsl({}, 65%, 70%)", hash.unsigned_abs() % 360)
}

/// Display name of a neighbourhood from its properties.
///
/// Returns the first of [`NEIGHBOURHOOD_NAME_KEYS`] with a non-blank
/// string, number or bool value, trimmed.
#[must_use]
pub fn neighbourhood_name(properties: &Map<String, Value>) -> String {
    NEIGHBOURHOOD_NAME_KEYS
        .iter()
        .find_map(|key| {
            let text = match properties.get(*key)? {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| UNKNOWN_NEIGHBOURHOOD.to_string())
}

/// Sets [`FILL_COLOR_PROPERTY`] on a neighbourhood's properties from its
/// name and returns the colour.
pub fn assign_neighbourhood_fill(properties: &mut Map<String, Value>) -> String {
    let color = stable_color(&neighbourhood_name(properties));
    properties.insert(
        FILL_COLOR_PROPERTY.to_string(),
        Value::String(color.clone()),
    );
    color
}

/// Heatmap layer paint for one amenity category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapPaint {
    /// Per-point weight from the `weight` property.
    #[serde(rename = "heatmap-weight")]
    pub weight: Expression,
    /// Global intensity multiplier.
    #[serde(rename = "heatmap-intensity")]
    pub intensity: f64,
    /// Kernel radius in pixels.
    #[serde(rename = "heatmap-radius")]
    pub radius: f64,
    /// Layer opacity.
    #[serde(rename = "heatmap-opacity")]
    pub opacity: f64,
    /// Colour ramp over heatmap density.
    #[serde(rename = "heatmap-color")]
    pub color: Expression,
}

/// Heatmap layer id for a point layer.
#[must_use]
pub fn heatmap_layer_id(layer_id: &str) -> String {
    format!("{layer_id}-heatmap")
}

/// Builds the heatmap paint for `category`.
///
/// Density fades in from transparent through the category colour to a
/// shared orange-red ramp.
#[must_use]
pub fn heatmap_paint(category: &HeatmapCategory) -> HeatmapPaint {
    let weight = Expression::interpolate_linear(
        Expression::get("weight"),
        vec![(0.0, Expression::number(0.0)), (6.0, Expression::number(1.0))],
    );
    let color = Expression::interpolate_linear(
        Expression::HeatmapDensity,
        vec![
            (0.0, Expression::string("rgba(0,0,0,0)")),
            (0.15, Expression::string(category.color.clone())),
            (0.4, Expression::string("#feb24c")),
            (0.7, Expression::string("#fd8d3c")),
            (1.0, Expression::string("#b10026")),
        ],
    );

    HeatmapPaint {
        weight,
        intensity: 0.6,
        radius: 28.0,
        opacity: 0.55,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_map_layers_models::PointShape;
    use access_map_style::Evaluated;
    use serde_json::json;

    fn category() -> HeatmapCategory {
        HeatmapCategory {
            id: "grocery-stores".to_string(),
            label: "Grocery Stores".to_string(),
            color: "#3498db".to_string(),
            shape: PointShape::Square,
            description: "Show density of grocery stores.".to_string(),
        }
    }

    #[test]
    fn stable_color_is_deterministic_hue() {
        assert_eq!(stable_color(""), "hsl(0, 65%, 70%)");
        assert_eq!(stable_color("a"), "hsl(97, 65%, 70%)");
        assert_eq!(stable_color("ab"), "hsl(225, 65%, 70%)");
        assert_eq!(stable_color("Cathedral"), stable_color("Cathedral"));
    }

    #[test]
    fn stable_color_survives_overflow() {
        let long = "Heritage Community Association North Central";
        let color = stable_color(long);
        assert!(color.starts_with("hsl("));
        assert!(color.ends_with(", 65%, 70%)"));
    }

    #[test]
    fn neighbourhood_name_falls_back_through_keys() {
        let props = json!({ "NAME": "  ", "name": " Cathedral ", "NBNAME": "x" });
        assert_eq!(neighbourhood_name(props.as_object().unwrap()), "Cathedral");

        let props = json!({ "Boundary_Name": "Heritage", "name": "other" });
        assert_eq!(neighbourhood_name(props.as_object().unwrap()), "Heritage");

        let props = json!({ "NB_NAME": 12 });
        assert_eq!(neighbourhood_name(props.as_object().unwrap()), "12");

        let props = json!({ "name": null });
        assert_eq!(
            neighbourhood_name(props.as_object().unwrap()),
            UNKNOWN_NEIGHBOURHOOD
        );
    }

    #[test]
    fn assigns_fill_property() {
        let mut props = json!({ "NSA_NAME": "Lakeview" }).as_object().cloned().unwrap();
        let color = assign_neighbourhood_fill(&mut props);
        assert_eq!(color, stable_color("Lakeview"));
        assert_eq!(props.get(FILL_COLOR_PROPERTY), Some(&json!(color)));
    }

    #[test]
    fn heatmap_paint_serializes_to_paint_properties() {
        let paint = serde_json::to_value(heatmap_paint(&category())).unwrap();
        assert_eq!(
            paint,
            json!({
                "heatmap-weight": ["interpolate", ["linear"], ["get", "weight"], 0.0, 0.0, 6.0, 1.0],
                "heatmap-intensity": 0.6,
                "heatmap-radius": 28.0,
                "heatmap-opacity": 0.55,
                "heatmap-color": [
                    "interpolate", ["linear"], ["heatmap-density"],
                    0.0, "rgba(0,0,0,0)",
                    0.15, "#3498db",
                    0.4, "#feb24c",
                    0.7, "#fd8d3c",
                    1.0, "#b10026"
                ]
            })
        );
    }

    #[test]
    fn heatmap_weight_scales_with_property() {
        let paint = heatmap_paint(&category());
        let props = json!({ "weight": 3 }).as_object().cloned().unwrap();
        assert_eq!(paint.weight.evaluate(&props), Evaluated::Number(0.5));
        let props = json!({ "weight": 12 }).as_object().cloned().unwrap();
        assert_eq!(paint.weight.evaluate(&props), Evaluated::Number(1.0));
    }

    #[test]
    fn heatmap_color_uses_category_at_low_density() {
        let paint = heatmap_paint(&category());
        let props = Map::new();
        assert_eq!(
            paint.color.evaluate_at_density(&props, 0.2).as_str(),
            Some("#3498db")
        );
        assert_eq!(
            paint.color.evaluate_at_density(&props, 1.0).as_str(),
            Some("#b10026")
        );
    }

    #[test]
    fn heatmap_layer_ids() {
        assert_eq!(heatmap_layer_id("restaurants"), "restaurants-heatmap");
    }
}
