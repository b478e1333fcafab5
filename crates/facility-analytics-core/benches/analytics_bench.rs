//! Performance benchmarks for the analytics engine
//!
//! Covers normalization, both aggregators, KPI derivation and the full
//! report pipeline over synthetic portal data.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use facility_analytics_core::analytics::{
    aggregate_by_priority, aggregate_facility_usage, forecast, maintenance_kpis, ForecastParams,
    PeriodLabels,
};
use facility_analytics_core::models::{
    FacilityFilter, PriorityFilter, ReportConfig, ReportPeriod, ReportType,
};
use facility_analytics_core::parsers::RawCollections;
use facility_analytics_core::{generate_report, EngineSettings, ForecastRequest, LoadReport};
use serde_json::{json, Value};

const PRIORITIES: [&str; 5] = ["critical", "high", "medium", "low", "whenever"];
const STATUSES: [&str; 3] = ["reported", "in_progress", "completed"];
const CATEGORIES: [&str; 2] = ["Sports", "Study"];

/// Generate raw collections spread over `days` days and `facilities` facilities
fn generate_raw(count: usize, days: usize, facilities: usize) -> RawCollections {
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let day = |i: usize| origin + Duration::days((i % days) as i64);

    let bookings: Vec<Value> = (0..count)
        .map(|i| {
            let category = CATEGORIES[i % CATEGORIES.len()];
            json!({
                "facility_id": i % facilities,
                "facility_name": format!("Facility {}", i % facilities),
                "facility_category": category,
                "date": day(i).to_string(),
                "status": "approved",
            })
        })
        .collect();

    let events: Vec<Value> = (0..count / 2)
        .map(|i| {
            json!({
                "facility_id": i % facilities,
                "start_date": day(i).to_string(),
                "start_time": "09:00",
                "end_date": day(i).to_string(),
                "end_time": format!("{:02}:30", 10 + i % 8),
            })
        })
        .collect();

    let maintenance_reports: Vec<Value> = (0..count / 4)
        .map(|i| {
            let priority = PRIORITIES[i % PRIORITIES.len()];
            let status = STATUSES[i % STATUSES.len()];
            json!({
                "priority": priority,
                "status": status,
                "reported_date": format!("{}T08:00:00", day(i)),
                "completion_date": format!("{}T08:00:00", day(i + 2)),
            })
        })
        .collect();

    RawCollections {
        bookings,
        events,
        maintenance_reports,
    }
}

/// Benchmark 1: lenient normalization of all three collections
fn normalize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for count in [100, 1000, 10_000] {
        let raw = generate_raw(count, 30, 20);
        group.bench_with_input(BenchmarkId::new("records", count), &raw, |b, raw| {
            b.iter(|| {
                let mut report = LoadReport::new();
                black_box(raw.normalize(&mut report));
            });
        });
    }

    group.finish();
}

/// Benchmark 2: facility usage aggregation
fn facility_usage_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_facility_usage");

    for count in [100, 1000, 10_000] {
        let collections = generate_raw(count, 30, 50).normalize(&mut LoadReport::new());
        group.bench_with_input(
            BenchmarkId::new("records", count),
            &collections,
            |b, collections| {
                b.iter(|| {
                    black_box(aggregate_facility_usage(
                        &collections.bookings,
                        &collections.events,
                        &FacilityFilter::all(),
                    ));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 3: maintenance aggregation plus KPIs
fn maintenance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("maintenance_kpis");
    let settings = EngineSettings::default();

    for count in [100, 1000, 10_000] {
        let collections = generate_raw(count * 4, 30, 10).normalize(&mut LoadReport::new());
        group.bench_with_input(
            BenchmarkId::new("reports", count),
            &collections.maintenance,
            |b, reports| {
                b.iter(|| {
                    let rows: Vec<_> = aggregate_by_priority(reports, PriorityFilter::All)
                        .into_values()
                        .collect();
                    black_box(maintenance_kpis(&rows, &settings));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 4: forecast projection
fn forecast_benchmark(c: &mut Criterion) {
    let params = ForecastParams::new(180.0, 8.0).with_variance(3.0);

    c.bench_function("forecast_24_periods", |b| {
        b.iter(|| {
            black_box(forecast(params, 24, PeriodLabels::Relative));
        });
    });
}

/// Benchmark 5: full report pipeline (generate_report)
fn full_pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let settings = EngineSettings::default();
    let period = ReportPeriod {
        start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    };
    let request = ForecastRequest::new(6);

    for report_type in [ReportType::FacilityUsage, ReportType::Maintenance] {
        let collections = generate_raw(5000, 60, 40).normalize(&mut LoadReport::new());
        let config = ReportConfig::new(report_type, period);
        group.bench_with_input(
            BenchmarkId::new("report", report_type),
            &collections,
            |b, collections| {
                b.iter(|| {
                    black_box(generate_report(&config, collections, &settings, Some(&request)));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    normalize_benchmark,
    facility_usage_benchmark,
    maintenance_benchmark,
    forecast_benchmark,
    full_pipeline_benchmark
);
criterion_main!(benches);
