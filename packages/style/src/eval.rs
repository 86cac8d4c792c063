//! Interpreter for [`Expression`] trees.
//!
//! Mirrors the renderer's semantics closely enough to verify that a
//! generated rule colours a feature the same way the legend claims it
//! does. Errors the renderer would raise (e.g. `to-number` on garbage)
//! evaluate to NaN instead, which fails every comparison.

use serde_json::{Map, Value};

use crate::{Expression, Interpolation};

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// Missing property or unsupported value.
    Null,
    /// Boolean result of a comparison.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value (colours included).
    String(String),
}

impl Evaluated {
    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Null,
        }
    }
}

/// Coerces a raw property value to a number.
///
/// JSON numbers pass through; strings are trimmed and parsed. Blank
/// strings, booleans, nulls, arrays and objects have no numeric value.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

struct Context<'a> {
    properties: &'a Map<String, Value>,
    heatmap_density: Option<f64>,
}

impl Expression {
    /// Evaluates the expression against one feature's properties.
    #[must_use]
    pub fn evaluate(&self, properties: &Map<String, Value>) -> Evaluated {
        self.eval(&Context {
            properties,
            heatmap_density: None,
        })
    }

    /// Evaluates a heatmap paint expression at the given density (0..=1).
    #[must_use]
    pub fn evaluate_at_density(&self, properties: &Map<String, Value>, density: f64) -> Evaluated {
        self.eval(&Context {
            properties,
            heatmap_density: Some(density),
        })
    }

    fn eval(&self, ctx: &Context<'_>) -> Evaluated {
        match self {
            Self::Number(n) => Evaluated::Number(*n),
            Self::String(s) => Evaluated::String(s.clone()),
            Self::Get(key) => ctx
                .properties
                .get(key)
                .map_or(Evaluated::Null, Evaluated::from_json),
            Self::ToNumber(input) => {
                let number = match input.eval(ctx) {
                    Evaluated::Number(n) => Some(n),
                    Evaluated::String(s) => parse_numeric_str(&s),
                    Evaluated::Bool(_) | Evaluated::Null => None,
                };
                Evaluated::Number(number.unwrap_or(f64::NAN))
            }
            Self::Equal(lhs, rhs) => Evaluated::Bool(match (lhs.eval(ctx), rhs.eval(ctx)) {
                (Evaluated::Number(a), Evaluated::Number(b)) => a == b,
                (a, b) => a == b,
            }),
            Self::LessOrEqual(lhs, rhs) => {
                Evaluated::Bool(match (lhs.eval(ctx), rhs.eval(ctx)) {
                    (Evaluated::Number(a), Evaluated::Number(b)) => a <= b,
                    (Evaluated::String(a), Evaluated::String(b)) => a <= b,
                    _ => false,
                })
            }
            Self::Case { branches, fallback } => branches
                .iter()
                .find(|(condition, _)| condition.eval(ctx) == Evaluated::Bool(true))
                .map_or_else(|| fallback.eval(ctx), |(_, output)| output.eval(ctx)),
            Self::Interpolate {
                interpolation,
                input,
                stops,
            } => match input.eval(ctx) {
                Evaluated::Number(x) if !x.is_nan() => interpolate(*interpolation, x, stops, ctx),
                _ => Evaluated::Null,
            },
            Self::HeatmapDensity => ctx
                .heatmap_density
                .map_or(Evaluated::Null, Evaluated::Number),
        }
    }
}

/// Non-numeric outputs (colours) snap to the lower stop.
fn interpolate(
    interpolation: Interpolation,
    x: f64,
    stops: &[(f64, Expression)],
    ctx: &Context<'_>,
) -> Evaluated {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Evaluated::Null;
    };
    if x <= first.0 {
        return first.1.eval(ctx);
    }
    if x >= last.0 {
        return last.1.eval(ctx);
    }

    for pair in stops.windows(2) {
        let (lo_stop, lo_out) = &pair[0];
        let (hi_stop, hi_out) = &pair[1];
        if x < *lo_stop || x > *hi_stop {
            continue;
        }
        let lo = lo_out.eval(ctx);
        return match (interpolation, &lo, hi_out.eval(ctx)) {
            (Interpolation::Linear, Evaluated::Number(a), Evaluated::Number(b)) => {
                let t = (x - lo_stop) / (hi_stop - lo_stop);
                Evaluated::Number((b - a).mul_add(t, *a))
            }
            _ => lo,
        };
    }

    Evaluated::Null
}
