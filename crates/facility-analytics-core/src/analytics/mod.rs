//! Analytics engine for facility operations
//!
//! Aggregates normalized records into per-facility and per-priority rows,
//! derives KPIs, projects forecasts, and assembles report payloads. Everything
//! here is synchronous and side-effect-free; I/O stays in the loader and the
//! exporters.

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, info};

use crate::models::{
    BookingRecord, EventRecord, KpiSet, MaintenanceReport, ReportConfig, ReportPayload,
    ReportPeriod, ReportRows, ReportType,
};
use crate::parsers::filters::{facility_matches, within_period};
use crate::parsers::NormalizedCollections;
use crate::settings::EngineSettings;

pub mod facility_usage;
pub mod forecasting;
pub mod kpi;
pub mod maintenance;


pub use facility_usage::{aggregate_facility_usage, aggregate_facility_usage_by};
pub use forecasting::{
    forecast, forecast_from_history, ForecastParams, PeriodLabels, MAX_HORIZON,
};
pub use kpi::{facility_usage_kpis, maintenance_kpis, sla_compliance, utilization};
pub use maintenance::aggregate_by_priority;

/// Forecast options for a report
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Number of future periods (non-positive means no points)
    pub horizon: i64,
    /// Explicit history; when `None` the monthly activity of the report
    /// period is used
    pub history: Option<Vec<f64>>,
    pub labels: PeriodLabels,
}

impl ForecastRequest {
    pub fn new(horizon: i64) -> Self {
        Self {
            horizon,
            history: None,
            labels: PeriodLabels::Relative,
        }
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_labels(mut self, labels: PeriodLabels) -> Self {
        self.labels = labels;
        self
    }
}

/// Output of [`generate_report`]
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub report_type: ReportType,
    pub payload: ReportPayload,
    /// Records that fell inside the reporting period (before entity filters)
    pub records_in_period: usize,
}

/// Generate a complete report payload for `config`
///
/// Records are first restricted to the reporting period (records without a
/// usable date are kept), then aggregated with the profile of the report
/// type. Facility-usage growth compares against the preceding period of
/// equal length drawn from the same collections.
pub fn generate_report(
    config: &ReportConfig,
    collections: &NormalizedCollections,
    settings: &EngineSettings,
    forecast_request: Option<&ForecastRequest>,
) -> GeneratedReport {
    let period = config.period;
    let (rows, kpis, records_in_period, series) = match config.report_type {
        ReportType::FacilityUsage => {
            let bookings = bookings_in(&collections.bookings, &period);
            let events = events_in(&collections.events, &period);
            let usage = aggregate_facility_usage(&bookings, &events, &config.facility_filter);
            let rows: Vec<_> = usage.into_values().collect();

            let prior_period = period.previous();
            let prior: Vec<_> = aggregate_facility_usage(
                &bookings_in(&collections.bookings, &prior_period),
                &events_in(&collections.events, &prior_period),
                &config.facility_filter,
            )
            .into_values()
            .collect();

            let kpis = facility_usage_kpis(&rows, Some(prior.as_slice()), settings)
                .map(KpiSet::FacilityUsage);

            let activity_dates = bookings
                .iter()
                .filter(|b| facility_matches(&config.facility_filter, &b.facility))
                .filter_map(|b| b.date)
                .chain(
                    events
                        .iter()
                        .filter(|e| facility_matches(&config.facility_filter, &e.facility))
                        .filter_map(|e| e.start.map(|s| s.date())),
                );
            let series = monthly_series(&period, activity_dates);

            (
                ReportRows::FacilityUsage(rows),
                kpis,
                bookings.len() + events.len(),
                series,
            )
        }
        ReportType::Maintenance => {
            let reports = maintenance_in(&collections.maintenance, &period);
            let breakdown = aggregate_by_priority(&reports, config.priority_filter);
            let rows: Vec<_> = breakdown.into_values().collect();
            let kpis = KpiSet::Maintenance(maintenance_kpis(&rows, settings));

            let reported_dates = reports
                .iter()
                .filter(|r| config.priority_filter.matches(r.priority))
                .filter_map(|r| r.reported_at.map(|t| t.date()));
            let series = monthly_series(&period, reported_dates);

            (
                ReportRows::Maintenance(rows),
                Some(kpis),
                reports.len(),
                series,
            )
        }
    };

    let forecast = forecast_request.map(|request| {
        let history = request.history.as_deref().unwrap_or(&series[..]);
        forecast_from_history(history, request.horizon, request.labels, &settings.forecast)
    });

    info!(
        report_type = %config.report_type,
        period = %period,
        rows = rows.len(),
        records = records_in_period,
        forecast = forecast.as_ref().map(Vec::len).unwrap_or(0),
        "Generated report"
    );

    GeneratedReport {
        report_type: config.report_type,
        payload: ReportPayload::assemble(
            config.report_type.title(),
            period.to_string(),
            rows,
            kpis,
            forecast,
        ),
        records_in_period,
    }
}

fn bookings_in(bookings: &[BookingRecord], period: &ReportPeriod) -> Vec<BookingRecord> {
    bookings
        .iter()
        .filter(|b| within_period(period, b.date))
        .cloned()
        .collect()
}

fn events_in(events: &[EventRecord], period: &ReportPeriod) -> Vec<EventRecord> {
    events
        .iter()
        .filter(|e| within_period(period, e.start.map(|s| s.date())))
        .cloned()
        .collect()
}

fn maintenance_in(reports: &[MaintenanceReport], period: &ReportPeriod) -> Vec<MaintenanceReport> {
    reports
        .iter()
        .filter(|r| within_period(period, r.reported_at.map(|t| t.date())))
        .cloned()
        .collect()
}

/// Count dates per calendar month across the period, zero-filled
///
/// Returns an empty series when no date falls inside the period, so the
/// forecast falls back to its synthetic baseline.
pub fn monthly_series(period: &ReportPeriod, dates: impl Iterator<Item = NaiveDate>) -> Vec<f64> {
    let first = month_start(period.start);
    let last = month_start(period.end);

    let mut months = Vec::new();
    let mut cursor = Some(first);
    while let Some(month) = cursor.filter(|m| *m <= last) {
        months.push(month);
        cursor = month.checked_add_months(Months::new(1));
    }

    let mut counts = vec![0.0; months.len()];
    let mut seen = 0usize;
    for date in dates.filter(|d| period.contains(*d)) {
        if let Ok(index) = months.binary_search(&month_start(date)) {
            counts[index] += 1.0;
            seen += 1;
        }
    }

    debug!(months = months.len(), dated_records = seen, "Built monthly activity series");
    if seen == 0 {
        Vec::new()
    } else {
        counts
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
