#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the accessibility map toolchain.
//!
//! Classifies a demographic `GeoJSON` field into a choropleth, builds
//! geodesic buffers, finds amenities near a point, and prints the layer
//! catalog. Every command writes JSON to stdout; logging goes to stderr and
//! is controlled by `RUST_LOG`.

use std::path::PathBuf;
use std::str::FromStr;

use access_map_choropleth::models::{ClassificationMethod, ClassifyOptions, DEFAULT_CLASS_COUNT};
use access_map_choropleth::{classify, load_feature_collection_file};
use access_map_layers::{
    LayerVisibility, all_basemaps, all_heatmap_categories, all_layers, heatmap_paint,
    paint::{HeatmapPaint, heatmap_layer_id},
};
use access_map_spatial::{
    AmenityIndex, DEFAULT_BUFFER_RADIUS_M, DEFAULT_BUFFER_STEPS, PointLayer, accessibility_query,
    buffer_feature, geodesic_circle,
};
use clap::{Parser, Subcommand};
use geojson::FeatureCollection;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "access_map_cli", about = "Accessibility map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a numeric field into a choropleth (expression, legend, audit)
    Classify {
        /// `GeoJSON` file with the demographic features
        #[arg(long)]
        input: PathBuf,
        /// Property to classify
        #[arg(long)]
        field: String,
        /// Number of classes
        #[arg(long, default_value_t = DEFAULT_CLASS_COUNT)]
        classes: usize,
        /// `natural-breaks` or `quantile`
        #[arg(long, default_value = "natural-breaks")]
        method: String,
    },
    /// Print a geodesic buffer polygon as a `GeoJSON` feature
    Buffer {
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Radius in meters
        #[arg(long, default_value_t = DEFAULT_BUFFER_RADIUS_M)]
        radius: f64,
        /// Number of vertices around the circle
        #[arg(long, default_value_t = DEFAULT_BUFFER_STEPS)]
        steps: usize,
    },
    /// List amenities within a buffer around a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Radius in meters
        #[arg(long, default_value_t = DEFAULT_BUFFER_RADIUS_M)]
        radius: f64,
        /// Number of vertices around the circle
        #[arg(long, default_value_t = DEFAULT_BUFFER_STEPS)]
        steps: usize,
        /// Point layer as `ID=FILE` (repeatable). `ID` must be a catalog
        /// point layer
        #[arg(long = "layer", value_parser = parse_layer_file, required = true)]
        layers: Vec<LayerFile>,
        /// Catalog layer to switch off before searching (repeatable)
        #[arg(long = "hide")]
        hidden: Vec<String>,
    },
    /// List the map layer catalog
    Layers,
    /// List the selectable basemaps
    Basemaps,
    /// Print heatmap paint for an amenity category
    Heatmap {
        /// Heatmap category id (e.g. `grocery-stores`)
        #[arg(long)]
        category: String,
    },
}

/// A point layer given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerFile {
    id: String,
    path: PathBuf,
}

fn parse_layer_file(arg: &str) -> Result<LayerFile, String> {
    let (id, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=FILE, got '{arg}'"))?;
    if id.is_empty() || path.is_empty() {
        return Err(format!("expected ID=FILE, got '{arg}'"));
    }
    Ok(LayerFile {
        id: id.to_string(),
        path: PathBuf::from(path),
    })
}

#[derive(Serialize)]
struct NearbyOutput<'a> {
    buffer: geojson::Feature,
    amenities: &'a [access_map_spatial::NearbyAmenity],
}

#[derive(Serialize)]
struct HeatmapOutput<'a> {
    id: String,
    source: &'a str,
    paint: HeatmapPaint,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            input,
            field,
            classes,
            method,
        } => run_classify(&input, &field, classes, &method)?,
        Commands::Buffer {
            lng,
            lat,
            radius,
            steps,
        } => {
            let circle = geodesic_circle(lng, lat, radius, steps);
            print_json(&buffer_feature(&circle, radius))?;
        }
        Commands::Nearby {
            lng,
            lat,
            radius,
            steps,
            layers,
            hidden,
        } => {
            let mut visibility = LayerVisibility::default();
            for id in &hidden {
                if visibility.is_visible(id) {
                    visibility.toggle(id);
                } else {
                    log::warn!("Ignoring --hide for unknown layer '{id}'");
                }
            }
            run_nearby(lng, lat, radius, steps, &layers, &visibility)?;
        }
        Commands::Layers => print_json(&all_layers())?,
        Commands::Basemaps => print_json(&all_basemaps())?,
        Commands::Heatmap { category } => {
            let found = all_heatmap_categories()
                .into_iter()
                .find(|c| c.id == category)
                .ok_or_else(|| format!("Unknown heatmap category '{category}'"))?;
            print_json(&HeatmapOutput {
                id: heatmap_layer_id(&found.id),
                source: &found.id,
                paint: heatmap_paint(&found),
            })?;
        }
    }

    Ok(())
}

fn run_classify(
    input: &std::path::Path,
    field: &str,
    classes: usize,
    method: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let method = ClassificationMethod::from_str(method)
        .map_err(|_| format!("Unknown classification method '{method}'"))?;
    let options = ClassifyOptions {
        classes,
        method,
        ..ClassifyOptions::default()
    };

    let collection = load_feature_collection_file(input)?;
    let result = classify(field, &collection, &options);
    if result.is_empty() {
        log::warn!("No classifiable values for '{field}' in {}", input.display());
    }
    print_json(&result)
}

fn run_nearby(
    lng: f64,
    lat: f64,
    radius: f64,
    steps: usize,
    files: &[LayerFile],
    visibility: &LayerVisibility,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loaded = Vec::with_capacity(files.len());
    for file in files {
        check_point_layer(visibility, &file.id)?;
        if !visibility.is_visible(&file.id) {
            log::debug!("Layer '{}' is hidden, not loading {}", file.id, file.path.display());
            continue;
        }
        loaded.push((file.id.clone(), load_feature_collection_file(&file.path)?));
    }

    let index = index_visible_layers(visibility, &loaded);
    let result = accessibility_query(&index, geo::Point::new(lng, lat), radius, steps);
    print_json(&NearbyOutput {
        buffer: result.buffer_feature(),
        amenities: &result.amenities,
    })
}

fn check_point_layer(visibility: &LayerVisibility, id: &str) -> Result<(), String> {
    if visibility
        .layers()
        .iter()
        .any(|layer| layer.id == id && layer.is_point())
    {
        Ok(())
    } else {
        Err(format!("'{id}' is not a catalog point layer"))
    }
}

/// Indexes the loaded collections of the layers `visibility` shows, using
/// the catalog labels.
fn index_visible_layers(
    visibility: &LayerVisibility,
    loaded: &[(String, FeatureCollection)],
) -> AmenityIndex {
    let point_layers: Vec<PointLayer<'_>> = visibility
        .visible_point_layers()
        .into_iter()
        .filter_map(|def| {
            loaded
                .iter()
                .find(|(id, _)| *id == def.id)
                .map(|(_, collection)| PointLayer {
                    id: &def.id,
                    label: &def.label,
                    collection,
                })
        })
        .collect();

    AmenityIndex::from_layers(&point_layers)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_layer_files() {
        assert_eq!(
            parse_layer_file("grocery-stores=data/grocery.geojson").unwrap(),
            LayerFile {
                id: "grocery-stores".to_string(),
                path: PathBuf::from("data/grocery.geojson"),
            }
        );
        assert!(parse_layer_file("grocery.geojson").is_err());
        assert!(parse_layer_file("=grocery.geojson").is_err());
    }

    fn amenity(lng: f64, lat: f64, name: &str) -> geojson::Feature {
        let mut properties = geojson::JsonObject::new();
        properties.insert("Name".to_string(), serde_json::json!(name));
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![lng, lat]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn single(feature: geojson::Feature) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }
    }

    #[test]
    fn hidden_layers_drop_out_of_nearby_results() {
        let loaded = vec![
            (
                "restaurants".to_string(),
                single(amenity(-104.6180, 50.4455, "Diner")),
            ),
            (
                "grocery-stores".to_string(),
                single(amenity(-104.6170, 50.4450, "Co-op")),
            ),
        ];
        let center = geo::Point::new(-104.6189, 50.4452);

        let mut visibility = LayerVisibility::default();
        let index = index_visible_layers(&visibility, &loaded);
        let result = accessibility_query(&index, center, 1000.0, 96);
        let names: Vec<&str> = result.amenities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Diner", "Co-op"]);
        assert_eq!(result.amenities[0].layer_label, "Restaurants");

        assert_eq!(visibility.toggle("restaurants"), Some(false));
        let index = index_visible_layers(&visibility, &loaded);
        let result = accessibility_query(&index, center, 1000.0, 96);
        let names: Vec<&str> = result.amenities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Co-op"]);

        assert_eq!(visibility.toggle("restaurants"), Some(true));
        assert_eq!(index_visible_layers(&visibility, &loaded).len(), 2);
    }

    #[test]
    fn heatmap_output_names_layer_and_source() {
        let category = all_heatmap_categories()
            .into_iter()
            .find(|c| c.id == "restaurants")
            .unwrap();
        let output = serde_json::to_value(HeatmapOutput {
            id: heatmap_layer_id(&category.id),
            source: &category.id,
            paint: heatmap_paint(&category),
        })
        .unwrap();
        assert_eq!(output["id"], "restaurants-heatmap");
        assert_eq!(output["source"], "restaurants");
        assert_eq!(output["paint"]["heatmap-radius"], 28.0);
    }

    #[test]
    fn nearby_layers_must_be_catalog_point_layers() {
        let visibility = LayerVisibility::default();
        assert!(check_point_layer(&visibility, "grocery-stores").is_ok());
        assert!(check_point_layer(&visibility, "neighbourhoods").is_err());
        assert!(check_point_layer(&visibility, "libraries").is_err());
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "access_map_cli",
            "buffer",
            "--lng",
            "-104.6189",
            "--lat",
            "50.4452",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Buffer { lng, steps: 96, .. } if (lng + 104.6189).abs() < 1e-12
        ));
    }

    #[test]
    fn classify_defaults_to_natural_breaks() {
        let cli = Cli::try_parse_from([
            "access_map_cli",
            "classify",
            "--input",
            "census.geojson",
            "--field",
            "median_income",
        ])
        .unwrap();
        let Commands::Classify {
            classes, method, ..
        } = cli.command
        else {
            panic!("expected classify");
        };
        assert_eq!(classes, DEFAULT_CLASS_COUNT);
        assert_eq!(
            ClassificationMethod::from_str(&method).unwrap(),
            ClassificationMethod::NaturalBreaks
        );
    }
}
