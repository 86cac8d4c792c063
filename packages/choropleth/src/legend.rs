//! Legend construction.
//!
//! The legend is built from the same ranges and palette as the fill
//! expression, so entry `i` always shows the colour that branch `i` of the
//! expression paints.

use access_map_choropleth_models::{
    ClassRange, ClassificationMethod, Legend, LegendEntry, NO_DATA_LABEL, Palette,
};

use crate::ranges::interval_label;

/// Builds the legend for one classification. Returns a legend with no
/// entries when `ranges` is empty.
#[must_use]
pub fn build_legend(
    title: &str,
    ranges: &[ClassRange],
    palette: &Palette,
    method: ClassificationMethod,
) -> Legend {
    let mut entries: Vec<LegendEntry> = ranges
        .iter()
        .enumerate()
        .map(|(i, range)| LegendEntry {
            label: interval_label(range, i),
            color: palette.class_color(i).to_string(),
        })
        .collect();

    if !entries.is_empty() {
        entries.push(LegendEntry {
            label: NO_DATA_LABEL.to_string(),
            color: palette.no_data.clone(),
        });
    }

    Legend {
        title: title.to_string(),
        entries,
        note: format!(
            "Binning: {}. Ranges are exact and match the map.",
            method.label()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_bracket_rule_and_end_with_no_data() {
        let ranges = vec![
            ClassRange {
                lower: 0.5,
                upper: 4.0,
            },
            ClassRange {
                lower: 4.0,
                upper: 150.0,
            },
        ];
        let legend = build_legend(
            "median_age",
            &ranges,
            &Palette::default(),
            ClassificationMethod::NaturalBreaks,
        );

        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["[0.500, 4.00]", "(4.00, 150.0]", "No data (-99)"]);
        assert_eq!(legend.entries[0].color, "#f7fbff");
        assert_eq!(legend.entries[1].color, "#c6dbef");
        assert_eq!(legend.entries[2].color, "#9e9e9e");
        assert_eq!(legend.title, "median_age");
        assert!(legend.note.contains("Natural Breaks (Jenks)"));
    }

    #[test]
    fn empty_ranges_clear_the_legend() {
        let legend = build_legend("x", &[], &Palette::default(), ClassificationMethod::Quantile);
        assert!(legend.entries.is_empty());
    }
}
