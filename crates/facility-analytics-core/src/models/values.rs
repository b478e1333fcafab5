//! Scalar values shared by KPI sets and exported rows

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel rendered for ratios whose denominator is zero
pub const NOT_AVAILABLE: &str = "N/A";

/// A named metric's value: integer, pre-rounded number, or text
///
/// Numbers are always finite; constructors replace NaN/infinity with 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn text(s: impl Into<String>) -> Self {
        MetricValue::Text(s.into())
    }

    pub fn not_available() -> Self {
        MetricValue::Text(NOT_AVAILABLE.to_string())
    }

    /// `Some(x)` becomes a number, `None` becomes "N/A"
    pub fn number_or_na(value: Option<f64>) -> Self {
        value.map_or_else(Self::not_available, Self::from)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, MetricValue::Text(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(i) => write!(f, "{}", i),
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(finite_or_zero(value))
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Integer(i64::from(value))
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

/// Replace NaN and infinities with 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    finite_or_zero((value * factor).round() / factor)
}

/// Format with exactly one decimal ("48.0")
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", finite_or_zero(value))
}
