#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Declarative map styling expressions.
//!
//! The map renderer consumes styling rules as nested JSON arrays such as
//! `["case", ["==", ["get", "pop"], -99], "#9e9e9e", "#08519c"]`. This
//! crate models that vocabulary as a typed [`Expression`] tree so that
//! builders get compile-time shape checking, while [`serde::Serialize`]
//! still produces the exact array form the renderer expects.
//!
//! [`Expression::evaluate`] interprets a tree against a feature's
//! properties. Nothing in the rendering path calls it; it exists so the
//! colour a feature *would* receive can be checked against the legend.

pub mod eval;

use serde::ser::{Serialize, SerializeSeq, Serializer};

pub use eval::{Evaluated, coerce_number};

/// Interpolation curve for [`Expression::Interpolate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight-line interpolation between adjacent stops.
    Linear,
}

impl Serialize for Interpolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1))?;
        match self {
            Self::Linear => seq.serialize_element("linear")?,
        }
        seq.end()
    }
}

/// A node in a declarative styling expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric literal.
    Number(f64),
    /// String literal (colours are plain strings such as `"#08519c"`).
    String(String),
    /// `["get", key]` reads a feature property.
    Get(String),
    /// `["to-number", input]` coerces a value to a number.
    ToNumber(Box<Self>),
    /// `["==", lhs, rhs]`.
    Equal(Box<Self>, Box<Self>),
    /// `["<=", lhs, rhs]`.
    LessOrEqual(Box<Self>, Box<Self>),
    /// `["case", cond1, out1, cond2, out2, ..., fallback]`.
    Case {
        /// Condition/output pairs, tested in order.
        branches: Vec<(Self, Self)>,
        /// Output when no condition holds.
        fallback: Box<Self>,
    },
    /// `["interpolate", ["linear"], input, stop1, out1, ...]`.
    Interpolate {
        /// Curve between stops.
        interpolation: Interpolation,
        /// Numeric input.
        input: Box<Self>,
        /// Ascending `(stop, output)` pairs.
        stops: Vec<(f64, Self)>,
    },
    /// `["heatmap-density"]`, only meaningful inside heatmap paint.
    HeatmapDensity,
}

impl Expression {
    /// Numeric literal.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// String literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Property lookup.
    #[must_use]
    pub fn get(key: impl Into<String>) -> Self {
        Self::Get(key.into())
    }

    /// Numeric coercion of `input`.
    #[must_use]
    pub fn to_number(input: Self) -> Self {
        Self::ToNumber(Box::new(input))
    }

    /// Shorthand for `["to-number", ["get", key]]`.
    #[must_use]
    pub fn numeric_property(key: impl Into<String>) -> Self {
        Self::to_number(Self::get(key))
    }

    /// Equality test.
    #[must_use]
    pub fn eq(lhs: Self, rhs: Self) -> Self {
        Self::Equal(Box::new(lhs), Box::new(rhs))
    }

    /// Less-than-or-equal test.
    #[must_use]
    pub fn le(lhs: Self, rhs: Self) -> Self {
        Self::LessOrEqual(Box::new(lhs), Box::new(rhs))
    }

    /// Conditional with a trailing fallback.
    #[must_use]
    pub fn case(branches: Vec<(Self, Self)>, fallback: Self) -> Self {
        Self::Case {
            branches,
            fallback: Box::new(fallback),
        }
    }

    /// Linear interpolation over ascending stops.
    #[must_use]
    pub fn interpolate_linear(input: Self, stops: Vec<(f64, Self)>) -> Self {
        Self::Interpolate {
            interpolation: Interpolation::Linear,
            input: Box::new(input),
            stops,
        }
    }

    /// Operator name as it appears in the serialized array, or `None`
    /// for literals.
    #[must_use]
    pub const fn operator(&self) -> Option<&'static str> {
        match self {
            Self::Number(_) | Self::String(_) => None,
            Self::Get(_) => Some("get"),
            Self::ToNumber(_) => Some("to-number"),
            Self::Equal(..) => Some("=="),
            Self::LessOrEqual(..) => Some("<="),
            Self::Case { .. } => Some("case"),
            Self::Interpolate { .. } => Some("interpolate"),
            Self::HeatmapDensity => Some("heatmap-density"),
        }
    }

    /// Converts the expression into its nested-array JSON form.
    ///
    /// Non-finite numeric literals become `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Get(key) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element("get")?;
                seq.serialize_element(key)?;
                seq.end()
            }
            Self::ToNumber(input) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element("to-number")?;
                seq.serialize_element(input)?;
                seq.end()
            }
            Self::Equal(lhs, rhs) | Self::LessOrEqual(lhs, rhs) => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(self.operator().unwrap_or_default())?;
                seq.serialize_element(lhs)?;
                seq.serialize_element(rhs)?;
                seq.end()
            }
            Self::Case { branches, fallback } => {
                let mut seq = serializer.serialize_seq(Some(2 + branches.len() * 2))?;
                seq.serialize_element("case")?;
                for (condition, output) in branches {
                    seq.serialize_element(condition)?;
                    seq.serialize_element(output)?;
                }
                seq.serialize_element(fallback)?;
                seq.end()
            }
            Self::Interpolate {
                interpolation,
                input,
                stops,
            } => {
                let mut seq = serializer.serialize_seq(Some(3 + stops.len() * 2))?;
                seq.serialize_element("interpolate")?;
                seq.serialize_element(interpolation)?;
                seq.serialize_element(input)?;
                for (stop, output) in stops {
                    seq.serialize_element(stop)?;
                    seq.serialize_element(output)?;
                }
                seq.end()
            }
            Self::HeatmapDensity => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element("heatmap-density")?;
                seq.end()
            }
        }
    }
}
