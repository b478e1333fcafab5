//! Report payload handed to exporters and visualizers

use serde::Serialize;

use super::aggregates::{FacilityUsageAggregate, PriorityAggregate, ReportRow};
use super::kpi::KpiSet;
use super::values::MetricValue;

/// One projected future period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub period_label: String,
    pub projected: i64,
    pub lower_bound: i64,
    pub upper_bound: i64,
}

/// Ordered aggregate rows of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportRows {
    FacilityUsage(Vec<FacilityUsageAggregate>),
    Maintenance(Vec<PriorityAggregate>),
}

impl ReportRows {
    pub fn len(&self) -> usize {
        match self {
            ReportRows::FacilityUsage(rows) => rows.len(),
            ReportRows::Maintenance(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Each row flattened to named cells, in row order
    pub fn flattened(&self) -> Vec<Vec<(&'static str, MetricValue)>> {
        match self {
            ReportRows::FacilityUsage(rows) => rows.iter().map(ReportRow::fields).collect(),
            ReportRows::Maintenance(rows) => rows.iter().map(ReportRow::fields).collect(),
        }
    }
}

/// Immutable bundle of title, period, rows, KPIs and optional forecast
///
/// Built once per report request by [`ReportPayload::assemble`]; fields are
/// read-only so nothing downstream can drift from what the engine computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    title: String,
    period: String,
    rows: ReportRows,
    kpis: Option<KpiSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<Vec<ForecastPoint>>,
}

impl ReportPayload {
    /// Bundle already-computed parts; never fails and never recomputes
    pub fn assemble(
        title: impl Into<String>,
        period: impl Into<String>,
        rows: ReportRows,
        kpis: Option<KpiSet>,
        forecast: Option<Vec<ForecastPoint>>,
    ) -> Self {
        Self {
            title: title.into(),
            period: period.into(),
            rows,
            kpis,
            forecast,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn rows(&self) -> &ReportRows {
        &self.rows
    }

    /// `None` for a usage report with no rows; maintenance KPIs are always set
    pub fn kpis(&self) -> Option<&KpiSet> {
        self.kpis.as_ref()
    }

    pub fn forecast(&self) -> Option<&[ForecastPoint]> {
        self.forecast.as_deref()
    }
}
