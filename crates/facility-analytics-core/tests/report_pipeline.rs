//! Integration tests: data directory -> loader -> engine -> exporters

use facility_analytics_core::models::{KpiSet, ReportConfig, ReportRows};
use facility_analytics_core::parsers::collections::{BOOKINGS_FILE, EVENTS_FILE, MAINTENANCE_FILE};
use facility_analytics_core::{
    export_report_to_csv, export_report_to_json, generate_report, CollectionLoader,
    CollectionSource, EngineSettings, ForecastRequest, LoadReport,
};
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn seed_portal_export(dir: &Path) {
    write(
        dir,
        BOOKINGS_FILE,
        r#"[
            {"facility_id": 1, "facility_name": "Gym", "facility_category": "Sports", "date": "2024-01-05", "status": "approved"},
            {"facility_id": 1, "facility_name": "Gym", "facility_category": "Sports", "date": "2024-01-06", "status": "pending"},
            {"facility_id": 2, "facility_name": "Library", "facility_category": "Study", "date": "2024-01-07"},
            {"facility_id": 2, "facility_name": "Library", "date": "2023-11-30"},
            {"status": "approved", "date": "2024-01-08"}
        ]"#,
    );
    write(
        dir,
        EVENTS_FILE,
        r#"[
            {"facility_id": 1, "facility_name": "Gym", "facility_category": "Sports",
             "start_date": "2024-01-05", "start_time": "10:00", "end_date": "2024-01-05", "end_time": "13:00"},
            {"facility_id": "2", "start_date": "2024-01-09", "start_time": "09:00", "end_date": "2024-01-09", "end_time": "10:30"}
        ]"#,
    );
    write(
        dir,
        MAINTENANCE_FILE,
        r#"[
            {"priority": "high", "status": "completed", "reported_date": "2024-01-01T00:00:00", "completion_date": "2024-01-03T00:00:00"},
            {"priority": "High", "status": "reported", "reported_date": "2024-01-10T00:00:00"},
            {"priority": "critical", "status": "completed", "reported_date": "2024-01-02T00:00:00", "completion_date": "2024-01-04T00:00:00"},
            {"status": "reported"}
        ]"#,
    );
}

fn config(json: &str) -> ReportConfig {
    let config: ReportConfig = serde_json::from_str(json).unwrap();
    config.validate().unwrap();
    config
}

async fn load(dir: &Path) -> (facility_analytics_core::NormalizedCollections, LoadReport) {
    let mut report = LoadReport::new();
    let collections = CollectionLoader::new()
        .load_normalized(&CollectionSource::Directory(dir.to_path_buf()), &mut report)
        .await
        .unwrap();
    (collections, report)
}

#[tokio::test]
async fn test_usage_report_end_to_end() {
    let dir = TempDir::new().unwrap();
    seed_portal_export(dir.path());
    let (collections, load_report) = load(dir.path()).await;

    // Booking without facility_id and maintenance without priority are degraded, not dropped
    assert_eq!(load_report.records_degraded, 2);
    assert_eq!(collections.bookings.len(), 5);
    assert_eq!(collections.maintenance.len(), 4);

    let config = config(
        r#"{"reportType": "facility-usage", "period": {"start": "2024-01-01", "end": "2024-01-31"}}"#,
    );
    let report = generate_report(&config, &collections, &EngineSettings::default(), None);

    let rows = match report.payload.rows() {
        ReportRows::FacilityUsage(rows) => rows.clone(),
        other => panic!("unexpected rows {:?}", other),
    };
    let summary: Vec<_> = rows
        .iter()
        .map(|r| {
            (
                r.facility_id.to_string(),
                r.bookings_count,
                r.events_count,
                r.total_event_hours,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("1".to_string(), 2, 1, 3.0),
            ("2".to_string(), 1, 1, 1.5),
            ("unknown".to_string(), 1, 0, 0.0),
        ]
    );
    assert_eq!(rows[2].facility_name, "Facility unknown");

    let Some(KpiSet::FacilityUsage(kpis)) = report.payload.kpis() else {
        panic!("expected usage KPIs");
    };
    assert_eq!(kpis.total_bookings, 4);
    assert_eq!(kpis.total_events, 2);
    assert_eq!(kpis.total_hours, 4.5);
    assert_eq!(kpis.total_revenue, 337.5);
}

#[tokio::test]
async fn test_category_filtered_report_to_csv() {
    let dir = TempDir::new().unwrap();
    seed_portal_export(dir.path());
    let (collections, _) = load(dir.path()).await;

    let config = config(
        r#"{
            "reportType": "facility-usage",
            "period": {"start": "2024-01-01", "end": "2024-01-31"},
            "facilityFilter": {"category": "sports"}
        }"#,
    );
    let report = generate_report(&config, &collections, &EngineSettings::default(), None);

    let out = dir.path().join("exports/usage.csv");
    export_report_to_csv(&report.payload, &out).unwrap();

    let csv = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        csv,
        "facility_id,facility_name,bookings_count,events_count,total_event_hours\n\
         \"1\",\"Gym\",2,1,3"
    );
}

#[tokio::test]
async fn test_maintenance_report_with_settings_and_forecast() {
    let dir = TempDir::new().unwrap();
    seed_portal_export(dir.path());
    let (collections, _) = load(dir.path()).await;

    let settings = EngineSettings::from_toml(
        "[rates]\ncost_per_report = 200.0\n",
        Path::new("settings.toml"),
    )
    .unwrap();

    let config = config(
        r#"{"reportType": "maintenance", "period": {"start": "2024-01-01", "end": "2024-01-31"}, "priorityFilter": "All"}"#,
    );
    let request = ForecastRequest::new(2).with_history(vec![3.0, 4.0]);
    let report = generate_report(&config, &collections, &settings, Some(&request));

    let Some(KpiSet::Maintenance(kpis)) = report.payload.kpis() else {
        panic!("expected maintenance KPIs");
    };
    // high x2 (1 resolved, 48h), critical x1 (resolved, 48h), unknown x1 (undated, kept)
    assert_eq!(kpis.total_reports, 4);
    assert_eq!(kpis.total_resolved, 2);
    assert_eq!(kpis.resolution_rate, 50);
    assert_eq!(kpis.avg_resolution_time_label(), "48.0");
    assert_eq!(kpis.total_cost, 800.0);

    let critical = kpis
        .compliance_for(facility_analytics_core::models::Priority::Critical)
        .unwrap();
    assert_eq!(critical.compliance, 50.0);

    let forecast = report.payload.forecast().unwrap();
    let projected: Vec<_> = forecast.iter().map(|p| p.projected).collect();
    assert_eq!(projected, vec![5, 6]);

    let out = dir.path().join("maintenance.json");
    export_report_to_json(&report.payload, &out).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["kpis"]["avg_resolution_time"], 48.0);
    assert_eq!(json["forecast"][1]["upper_bound"], 7);
}

#[tokio::test]
async fn test_combined_document_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("portal.json");
    std::fs::write(
        &path,
        r#"{
            "bookings": [{"facilityId": 9, "facilityName": "Court", "bookingDate": "2024-02-01"}],
            "events": [],
            "maintenanceReports": [{"priority": "low", "status": "completed"}]
        }"#,
    )
    .unwrap();

    let mut load_report = LoadReport::new();
    let collections = CollectionLoader::new()
        .load_normalized(&CollectionSource::Combined(path), &mut load_report)
        .await
        .unwrap();

    assert!(!load_report.has_errors());
    assert_eq!(collections.bookings[0].facility.name, "Court");
    // Completed without timestamps: counted, never resolved
    assert_eq!(collections.maintenance[0].resolution_hours(), None);
}

#[tokio::test]
async fn test_empty_data_dir_yields_empty_report() {
    let dir = TempDir::new().unwrap();
    let (collections, load_report) = load(dir.path()).await;
    assert_eq!(load_report.warnings().count(), 3);

    let config = config(
        r#"{"reportType": "maintenance", "period": {"start": "2024-01-01", "end": "2024-01-31"}}"#,
    );
    let report = generate_report(&config, &collections, &EngineSettings::default(), None);

    assert!(report.payload.rows().is_empty());
    let Some(KpiSet::Maintenance(kpis)) = report.payload.kpis() else {
        panic!("expected maintenance KPIs");
    };
    assert_eq!(kpis.resolution_rate, 0);
    assert_eq!(kpis.avg_resolution_time_label(), "N/A");
}
