//! Collection loader: the input boundary of the engine
//!
//! Reads the three raw collections the portal fetches (bookings, events,
//! maintenance reports) and runs the lenient normalizer over them. In a data
//! directory the three files are read concurrently, the way the report page
//! fires its three API requests in parallel.

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::normalizer::{
    normalize_batch, normalize_booking_lenient, normalize_event_lenient,
    normalize_maintenance_lenient,
};
use crate::error::{CoreError, LoadError, LoadReport};
use crate::models::{BookingRecord, EventRecord, MaintenanceReport, RecordKind};

pub const BOOKINGS_FILE: &str = "bookings.json";
pub const EVENTS_FILE: &str = "events.json";
pub const MAINTENANCE_FILE: &str = "maintenance.json";

/// Raw, loosely-typed collections as fetched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollections {
    #[serde(default)]
    pub bookings: Vec<Value>,
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(default, alias = "maintenanceReports", alias = "maintenance")]
    pub maintenance_reports: Vec<Value>,
}

/// Collections after normalization
#[derive(Debug, Clone, Default)]
pub struct NormalizedCollections {
    pub bookings: Vec<BookingRecord>,
    pub events: Vec<EventRecord>,
    pub maintenance: Vec<MaintenanceReport>,
}

impl RawCollections {
    /// Normalize every record, keeping degraded ones; issues land in `report`
    pub fn normalize(&self, report: &mut LoadReport) -> NormalizedCollections {
        let collections = NormalizedCollections {
            bookings: normalize_batch(
                &self.bookings,
                RecordKind::Booking,
                normalize_booking_lenient,
                report,
            ),
            events: normalize_batch(
                &self.events,
                RecordKind::Event,
                normalize_event_lenient,
                report,
            ),
            maintenance: normalize_batch(
                &self.maintenance_reports,
                RecordKind::Maintenance,
                normalize_maintenance_lenient,
                report,
            ),
        };
        report.bookings_loaded += collections.bookings.len();
        report.events_loaded += collections.events.len();
        report.maintenance_loaded += collections.maintenance.len();
        collections
    }
}

/// Loader for raw collections on disk
#[derive(Debug, Clone, Default)]
pub struct CollectionLoader;

impl CollectionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load `bookings.json`, `events.json` and `maintenance.json` from `dir`
    ///
    /// The three reads run concurrently. A missing file degrades to an empty
    /// collection with a warning; malformed JSON is an error.
    pub async fn load_dir(
        &self,
        dir: &Path,
        report: &mut LoadReport,
    ) -> Result<RawCollections, CoreError> {
        let bookings_path = dir.join(BOOKINGS_FILE);
        let events_path = dir.join(EVENTS_FILE);
        let maintenance_path = dir.join(MAINTENANCE_FILE);

        let (bookings, events, maintenance) = tokio::join!(
            read_array(&bookings_path, "bookings"),
            read_array(&events_path, "events"),
            read_array(&maintenance_path, "maintenance"),
        );

        let collections = RawCollections {
            bookings: degrade_missing(bookings, "bookings", report)?,
            events: degrade_missing(events, "events", report)?,
            maintenance_reports: degrade_missing(maintenance, "maintenance", report)?,
        };

        info!(
            dir = %dir.display(),
            bookings = collections.bookings.len(),
            events = collections.events.len(),
            maintenance = collections.maintenance_reports.len(),
            "Loaded raw collections"
        );
        Ok(collections)
    }

    /// Load a single document `{bookings, events, maintenance_reports}`
    pub async fn load_combined(&self, path: &Path) -> Result<RawCollections, CoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::from_io(path, e))?;
        let collections = parse_combined(&content, path)?;
        debug!(path = %path.display(), "Loaded combined collections document");
        Ok(collections)
    }

    /// Load and normalize in one step
    pub async fn load_normalized(
        &self,
        source: &CollectionSource,
        report: &mut LoadReport,
    ) -> Result<NormalizedCollections, CoreError> {
        let raw = match source {
            CollectionSource::Directory(dir) => self.load_dir(dir, report).await?,
            CollectionSource::Combined(path) => self.load_combined(path).await?,
        };
        Ok(raw.normalize(report))
    }
}

/// Where the raw collections live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSource {
    Directory(PathBuf),
    Combined(PathBuf),
}

/// Parse a combined collections document
pub fn parse_combined(content: &str, path: &Path) -> Result<RawCollections, CoreError> {
    serde_json::from_str(content).map_err(|e| CoreError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: e,
    })
}

async fn read_array(path: &Path, collection: &str) -> Result<Vec<Value>, CoreError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::from_io(path, e))?;

    let value: Value = serde_json::from_str(&content).map_err(|e| CoreError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
        source: e,
    })?;

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CoreError::NotACollection {
            path: path.to_path_buf(),
            collection: collection.to_string(),
        }),
    }
}

fn degrade_missing(
    result: Result<Vec<Value>, CoreError>,
    collection: &str,
    report: &mut LoadReport,
) -> Result<Vec<Value>, CoreError> {
    match result {
        Ok(items) => Ok(items),
        Err(e @ CoreError::FileNotFound { .. }) => {
            report.add_error(LoadError::from_core_error(collection, &e));
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use crate::models::Priority;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_dir_reads_all_three() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(BOOKINGS_FILE),
            r#"[{"facility_id": 1, "date": "2024-01-02"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(EVENTS_FILE),
            r#"[{"facility_id": 1, "start_date": "2024-01-02", "end_date": "2024-01-02"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(MAINTENANCE_FILE),
            r#"[{"priority": "critical", "status": "reported"}]"#,
        )
        .unwrap();

        let mut report = LoadReport::new();
        let collections = CollectionLoader::new()
            .load_normalized(
                &CollectionSource::Directory(dir.path().to_path_buf()),
                &mut report,
            )
            .await
            .unwrap();

        assert_eq!(collections.bookings.len(), 1);
        assert_eq!(collections.events.len(), 1);
        assert_eq!(collections.maintenance[0].priority, Priority::Critical);
        assert!(!report.has_errors());
        assert_eq!(report.bookings_loaded, 1);
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BOOKINGS_FILE), "[]").unwrap();

        let mut report = LoadReport::new();
        let raw = CollectionLoader::new()
            .load_dir(dir.path(), &mut report)
            .await
            .unwrap();

        assert!(raw.events.is_empty());
        assert!(raw.maintenance_reports.is_empty());
        assert_eq!(report.warnings().count(), 2);
        assert!(report.warnings().all(|w| w.severity == ErrorSeverity::Warning));
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BOOKINGS_FILE), "[{not json").unwrap();

        let mut report = LoadReport::new();
        let result = CollectionLoader::new().load_dir(dir.path(), &mut report).await;
        assert!(matches!(result, Err(CoreError::JsonParse { .. })));
    }

    #[tokio::test]
    async fn test_object_instead_of_array_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(EVENTS_FILE), r#"{"events": []}"#).unwrap();

        let mut report = LoadReport::new();
        let result = CollectionLoader::new().load_dir(dir.path(), &mut report).await;
        assert!(matches!(result, Err(CoreError::NotACollection { .. })));
    }

    #[test]
    fn test_parse_combined_aliases() {
        let raw = parse_combined(
            r#"{"bookings": [{}], "maintenanceReports": [{"priority": "low"}]}"#,
            Path::new("data.json"),
        )
        .unwrap();
        assert_eq!(raw.bookings.len(), 1);
        assert!(raw.events.is_empty());
        assert_eq!(raw.maintenance_reports.len(), 1);

        let mut report = LoadReport::new();
        let normalized = raw.normalize(&mut report);
        // The booking has no facility_id: kept, but reported
        assert_eq!(normalized.bookings.len(), 1);
        assert_eq!(report.records_degraded, 1);
    }
}
