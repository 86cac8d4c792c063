#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth classification result types.
//!
//! These types describe one classification of a demographic field: the
//! class ranges, the colour palette they map onto, the legend shown next
//! to the map, and a per-class audit used to verify that the map and the
//! legend agree. They carry no behaviour beyond the range membership
//! rule, which every consumer must share.

use access_map_style::Expression;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Field value meaning "no data". Never classified; always drawn in
/// [`Palette::no_data`].
pub const NO_DATA_VALUE: f64 = -99.0;

/// Legend label for the no-data entry.
pub const NO_DATA_LABEL: &str = "No data (-99)";

/// Number of classes used when the caller does not specify one.
pub const DEFAULT_CLASS_COUNT: usize = 5;

/// One class interval.
///
/// The first range of a classification is closed on both ends
/// (`[lower, upper]`); every later range excludes its lower bound
/// (`(lower, upper]`), which is always the previous range's upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRange {
    /// Lower breakpoint.
    pub lower: f64,
    /// Upper breakpoint (inclusive).
    pub upper: f64,
}

impl ClassRange {
    /// Whether `value` belongs to this range. `first` selects the closed
    /// lower bound used by the first range only.
    #[must_use]
    pub fn contains(&self, value: f64, first: bool) -> bool {
        let above_lower = if first {
            value >= self.lower
        } else {
            value > self.lower
        };
        above_lower && value <= self.upper
    }
}

/// Returns the index of the range containing `value`, if any.
#[must_use]
pub fn bin_index(ranges: &[ClassRange], value: f64) -> Option<usize> {
    ranges
        .iter()
        .enumerate()
        .position(|(i, range)| range.contains(value, i == 0))
}

/// Ordered class colours plus the no-data colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Colour for class `i`, lightest first.
    pub classes: Vec<String>,
    /// Colour for features whose value is [`NO_DATA_VALUE`].
    pub no_data: String,
}

impl Palette {
    /// Colour of class `index`, clamped to the darkest colour.
    #[must_use]
    pub fn class_color(&self, index: usize) -> &str {
        self.classes
            .get(index)
            .or_else(|| self.classes.last())
            .map_or(self.no_data.as_str(), String::as_str)
    }
}

impl Default for Palette {
    /// Five-step sequential blue scale with a neutral gray for no data.
    fn default() -> Self {
        Self {
            classes: ["#f7fbff", "#c6dbef", "#6baed6", "#3182bd", "#08519c"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            no_data: "#9e9e9e".to_string(),
        }
    }
}

/// How breakpoints are chosen.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum ClassificationMethod {
    /// Jenks natural breaks (within-class variance minimization).
    #[default]
    NaturalBreaks,
    /// Equal-count quantiles with linear interpolation.
    Quantile,
}

impl ClassificationMethod {
    /// Human-readable name shown under the legend.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NaturalBreaks => "Natural Breaks (Jenks)",
            Self::Quantile => "Quantile",
        }
    }
}

/// Parameters for one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOptions {
    /// Requested class count. Clamped to the distinct value count and to
    /// the palette length.
    pub classes: usize,
    /// Breakpoint method.
    pub method: ClassificationMethod,
    /// Colours.
    pub palette: Palette,
    /// Sentinel excluded from classification.
    pub no_data_value: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            classes: DEFAULT_CLASS_COUNT,
            method: ClassificationMethod::default(),
            palette: Palette::default(),
            no_data_value: NO_DATA_VALUE,
        }
    }
}

/// A legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Interval text such as `(10.00, 25.50]`.
    pub label: String,
    /// Swatch colour.
    pub color: String,
}

/// Legend for one classified field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Field name shown as the legend heading.
    pub title: String,
    /// One entry per class, then the no-data entry.
    pub entries: Vec<LegendEntry>,
    /// Footnote naming the binning method.
    pub note: String,
}

/// Per-class row of the verification audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAudit {
    /// 1-based class number.
    pub class_index: usize,
    /// Same interval text as the legend.
    pub interval: String,
    /// Observations falling in the class.
    pub count: u64,
}

/// Verification audit for a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// Smallest classified observation.
    pub min: f64,
    /// Largest classified observation.
    pub max: f64,
    /// Features skipped (no data, missing, or non-numeric).
    pub excluded: usize,
    /// One row per class.
    pub rows: Vec<ClassAudit>,
}

impl Audit {
    /// Sum of all class counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }
}

/// A complete classification ready to hand to the map and the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choropleth {
    /// Classified property name.
    pub field: String,
    /// Method that produced the breakpoints.
    pub method: ClassificationMethod,
    /// `ranges.len() + 1` breakpoints.
    pub breaks: Vec<f64>,
    /// Class intervals.
    pub ranges: Vec<ClassRange>,
    /// Fill-colour rule for the renderer.
    pub expression: Expression,
    /// Legend mirroring `expression`.
    pub legend: Legend,
    /// Verification counts.
    pub audit: Audit,
}

/// Outcome of a classification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChoroplethResult {
    /// No classifiable values; the caller hides the layer and clears the
    /// legend.
    Empty {
        /// Requested property name.
        field: String,
    },
    /// Classification succeeded.
    Classified(Box<Choropleth>),
}

impl ChoroplethResult {
    /// Whether this is the empty state.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// The classification, if any.
    #[must_use]
    pub fn classified(&self) -> Option<&Choropleth> {
        match self {
            Self::Classified(choropleth) => Some(choropleth),
            Self::Empty { .. } => None,
        }
    }

    /// Requested property name.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Empty { field } => field,
            Self::Classified(choropleth) => &choropleth.field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    fn ranges() -> Vec<ClassRange> {
        vec![
            ClassRange {
                lower: 1.0,
                upper: 2.0,
            },
            ClassRange {
                lower: 2.0,
                upper: 4.0,
            },
        ]
    }

    #[test]
    fn first_range_includes_lower_bound() {
        assert_eq!(bin_index(&ranges(), 1.0), Some(0));
        assert_eq!(bin_index(&ranges(), 2.0), Some(0));
    }

    #[test]
    fn later_ranges_exclude_lower_bound() {
        assert_eq!(bin_index(&ranges(), 2.5), Some(1));
        assert_eq!(bin_index(&ranges(), 4.0), Some(1));
    }

    #[test]
    fn out_of_domain_values_have_no_bin() {
        assert_eq!(bin_index(&ranges(), 0.5), None);
        assert_eq!(bin_index(&ranges(), 4.5), None);
        assert_eq!(bin_index(&ranges(), f64::NAN), None);
        assert_eq!(bin_index(&[], 1.0), None);
    }

    #[test]
    fn palette_clamps_to_darkest() {
        let palette = Palette::default();
        assert_eq!(palette.class_color(0), "#f7fbff");
        assert_eq!(palette.class_color(4), "#08519c");
        assert_eq!(palette.class_color(9), "#08519c");
    }

    #[test]
    fn empty_palette_falls_back_to_no_data() {
        let palette = Palette {
            classes: vec![],
            no_data: "#000".to_string(),
        };
        assert_eq!(palette.class_color(0), "#000");
    }

    #[test]
    fn method_round_trips_through_strum() {
        assert_eq!(
            ClassificationMethod::from_str("natural-breaks").unwrap(),
            ClassificationMethod::NaturalBreaks
        );
        assert_eq!(ClassificationMethod::Quantile.to_string(), "quantile");
    }

    #[test]
    fn empty_result_serializes_with_status_tag() {
        let result = ChoroplethResult::Empty {
            field: "pop".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "status": "empty", "field": "pop" })
        );
        assert!(result.is_empty());
        assert_eq!(result.field(), "pop");
    }
}
