//! Forecast generator
//!
//! Deterministic linear-trend projection with a fixed ±10% band. The model is
//! either given directly (baseline, trend, variance) or fitted from a short
//! historical series; there is no randomness anywhere.

use chrono::{Months, NaiveDate};

use crate::models::ForecastPoint;
use crate::settings::ForecastSettings;

const LOWER_FACTOR: f64 = 0.9;
const UPPER_FACTOR: f64 = 1.1;

/// Longest projection `forecast` produces; larger horizons are truncated
pub const MAX_HORIZON: u32 = 1200;

/// Linear trend model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    /// Value the projection starts from (period 0)
    pub baseline: f64,
    /// Increment per period
    pub trend: f64,
    /// Extra absolute widening applied to both bounds
    pub variance: f64,
}

impl ForecastParams {
    pub fn new(baseline: f64, trend: f64) -> Self {
        Self {
            baseline,
            trend,
            variance: 0.0,
        }
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance.max(0.0);
        self
    }

    /// Synthetic model used when no history is available
    pub fn synthetic(settings: &ForecastSettings) -> Self {
        Self::new(settings.baseline, settings.trend).with_variance(settings.variance)
    }

    /// Fit `trend = (last - first) / (len - 1)` from a historical series
    ///
    /// The last observation becomes the baseline. A single point gives a flat
    /// trend; an empty series gives `None` (callers fall back to
    /// [`ForecastParams::synthetic`]). Non-finite values are ignored.
    pub fn from_history(series: &[f64]) -> Option<Self> {
        let values: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
        let (first, last) = match (values.first(), values.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return None,
        };

        let periods = values.len() - 1;
        let trend = if periods == 0 {
            0.0
        } else {
            (last - first) / periods as f64
        };
        Some(Self::new(last, trend))
    }
}

/// How forecast periods are labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodLabels {
    /// "Period +1", "Period +2", ...
    #[default]
    Relative,
    /// Calendar months following the anchor: "2024-02", "2024-03", ...
    MonthsAfter(NaiveDate),
}

impl PeriodLabels {
    pub fn label(&self, offset: u32) -> String {
        match self {
            PeriodLabels::Relative => format!("Period +{}", offset),
            PeriodLabels::MonthsAfter(anchor) => anchor
                .checked_add_months(Months::new(offset))
                .map(|month| month.format("%Y-%m").to_string())
                .unwrap_or_else(|| format!("Period +{}", offset)),
        }
    }
}

/// Project `horizon` future periods
///
/// For `i` in `1..=horizon`: `projected = baseline + trend x i`, clamped at 0,
/// with bounds `projected x 0.9 - variance` and `projected x 1.1 + variance`.
/// All three are rounded to integers; a non-positive horizon yields nothing
/// and a horizon above [`MAX_HORIZON`] is truncated to it.
pub fn forecast(
    params: ForecastParams,
    horizon: i64,
    labels: PeriodLabels,
) -> Vec<ForecastPoint> {
    if horizon <= 0 {
        return Vec::new();
    }
    let horizon = match u32::try_from(horizon) {
        Ok(h) if h <= MAX_HORIZON => h,
        _ => {
            tracing::warn!(horizon, max = MAX_HORIZON, "Forecast horizon truncated");
            MAX_HORIZON
        }
    };

    (1..=horizon)
        .map(|i| {
            let projected = (params.baseline + params.trend * f64::from(i)).max(0.0);
            let lower = (projected * LOWER_FACTOR - params.variance).max(0.0);
            let upper = projected * UPPER_FACTOR + params.variance;

            ForecastPoint {
                period_label: labels.label(i),
                projected: projected.round() as i64,
                lower_bound: lower.round() as i64,
                upper_bound: upper.round() as i64,
            }
        })
        .collect()
}

/// Forecast from history, falling back to the synthetic model
pub fn forecast_from_history(
    series: &[f64],
    horizon: i64,
    labels: PeriodLabels,
    fallback: &ForecastSettings,
) -> Vec<ForecastPoint> {
    let params = match ForecastParams::from_history(series) {
        Some(params) => params.with_variance(fallback.variance),
        None => {
            tracing::debug!("No forecast history, using synthetic baseline");
            ForecastParams::synthetic(fallback)
        }
    };
    forecast(params, horizon, labels)
}
