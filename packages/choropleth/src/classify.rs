//! Choropleth orchestration: feature collection in, styled classification
//! out.

use access_map_choropleth_models::{
    Audit, ChoroplethResult, ClassAudit, ClassRange, Choropleth, ClassifyOptions, bin_index,
};
use access_map_style::coerce_number;
use geojson::{Feature, FeatureCollection};

use crate::expression::build_color_expression;
use crate::legend::build_legend;
use crate::ranges::{compute_breaks, interval_label, ranges_from_breaks};

/// Numeric value of `field` on `feature`, if it has one.
///
/// Numbers pass through and numeric strings are parsed; anything else is
/// `None`. Non-finite results are returned as-is for the caller to
/// filter.
#[must_use]
pub fn field_value(feature: &Feature, field: &str) -> Option<f64> {
    feature
        .properties
        .as_ref()?
        .get(field)
        .and_then(coerce_number)
}

/// Classifiable values of `field` plus the number of skipped features.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    /// Finite, non-sentinel values in feature order.
    pub values: Vec<f64>,
    /// Features skipped because they had no usable value.
    pub excluded: usize,
}

/// Extracts the classifiable values of `field` from `collection`.
#[must_use]
pub fn collect_observations(
    field: &str,
    collection: &FeatureCollection,
    no_data_value: f64,
) -> Observations {
    let mut values = Vec::with_capacity(collection.features.len());
    let mut excluded = 0;

    for feature in &collection.features {
        match field_value(feature, field) {
            Some(value) if value.is_finite() && value != no_data_value => values.push(value),
            _ => excluded += 1,
        }
    }

    Observations { values, excluded }
}

/// Classifies `field` across `collection`.
///
/// Returns [`ChoroplethResult::Empty`] when no feature carries a usable
/// value; the caller should then hide the choropleth layer and clear the
/// legend. Never fails and never mutates `collection`.
#[must_use]
pub fn classify(
    field: &str,
    collection: &FeatureCollection,
    options: &ClassifyOptions,
) -> ChoroplethResult {
    let Observations { values, excluded } =
        collect_observations(field, collection, options.no_data_value);

    if values.is_empty() {
        log::warn!(
            "[{field}] No valid (non {}) values found in {} features",
            options.no_data_value,
            collection.features.len()
        );
        return ChoroplethResult::Empty {
            field: field.to_string(),
        };
    }

    let classes = options.classes.min(options.palette.classes.len());
    let breaks = compute_breaks(options.method, &values, classes);
    let ranges = ranges_from_breaks(&breaks);

    let expression =
        build_color_expression(field, &ranges, &options.palette, options.no_data_value);
    let legend = build_legend(field, &ranges, &options.palette, options.method);
    let audit = build_audit(&values, &ranges, excluded);

    log_audit(field, &audit);

    ChoroplethResult::Classified(Box::new(Choropleth {
        field: field.to_string(),
        method: options.method,
        breaks,
        ranges,
        expression,
        legend,
        audit,
    }))
}

/// Counts `values` per range using the same membership rule as the fill
/// expression.
#[must_use]
pub fn build_audit(values: &[f64], ranges: &[ClassRange], excluded: usize) -> Audit {
    let mut counts = vec![0_u64; ranges.len()];
    for &value in values {
        if let Some(index) = bin_index(ranges, value) {
            counts[index] += 1;
        }
    }

    let rows = ranges
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (range, count))| ClassAudit {
            class_index: i + 1,
            interval: interval_label(range, i),
            count,
        })
        .collect();

    Audit {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        excluded,
        rows,
    }
}

fn log_audit(field: &str, audit: &Audit) {
    log::debug!(
        "Choropleth ({field}) audit: min={} max={} classified={} excluded={}",
        audit.min,
        audit.max,
        audit.total(),
        audit.excluded
    );
    for row in &audit.rows {
        log::debug!(
            "  class {} {} count={}",
            row.class_index,
            row.interval,
            row.count
        );
    }
}
