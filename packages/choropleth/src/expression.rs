//! Fill-colour rule construction.

use access_map_choropleth_models::{ClassRange, Palette};
use access_map_style::Expression;

/// Builds the fill-colour rule for `field`.
///
/// ```text
/// ["case",
///   ["==", ["to-number", ["get", field]], no_data_value], palette.no_data,
///   ["<=", ["to-number", ["get", field]], upper₀], palette[0],
///   …
///   palette[last]]
/// ```
///
/// The trailing fallback catches values a hair above the top boundary.
/// With no ranges every feature falls back to the no-data colour.
#[must_use]
pub fn build_color_expression(
    field: &str,
    ranges: &[ClassRange],
    palette: &Palette,
    no_data_value: f64,
) -> Expression {
    let value = Expression::numeric_property(field);

    let mut branches = Vec::with_capacity(ranges.len() + 1);
    branches.push((
        Expression::eq(value.clone(), Expression::number(no_data_value)),
        Expression::string(&palette.no_data),
    ));
    for (i, range) in ranges.iter().enumerate() {
        branches.push((
            Expression::le(value.clone(), Expression::number(range.upper)),
            Expression::string(palette.class_color(i)),
        ));
    }

    let fallback = if ranges.is_empty() {
        palette.no_data.as_str()
    } else {
        palette.class_color(ranges.len() - 1)
    };

    Expression::case(branches, Expression::string(fallback))
}
