//! Record normalizer: raw API objects -> canonical records
//!
//! The strict entry points (`normalize_booking`, `normalize_event`,
//! `normalize_maintenance`) fail with [`ValidationError`] when a required key
//! is entirely absent. The batch entry points never drop a record: a record
//! that fails validation is rebuilt from fallback labels and the failure is
//! written to the [`LoadReport`], so one malformed row cannot make counts
//! vanish.
//!
//! Required keys: `facility_id` for bookings and events, `priority` for
//! maintenance reports. A key that is present but null, empty or
//! unrecognized is not an error; it degrades to `"Facility {id}"` /
//! `"unknown"`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fields::{self, Field};
use crate::error::{LoadReport, ValidationError};
use crate::models::{
    BookingRecord, BookingStatus, EventRecord, EventStatus, FacilityId, FacilityRef,
    MaintenanceReport, MaintenanceStatus, Priority, RecordKind,
};

const FACILITY_ID_KEYS: &[&str] = &["facility_id", "facilityId"];
const FACILITY_NAME_KEYS: &[&str] = &["facility_name", "facilityName"];
const FACILITY_CATEGORY_KEYS: &[&str] = &["facility_category", "facilityCategory"];
const STATUS_KEYS: &[&str] = &["status"];
const PRIORITY_KEYS: &[&str] = &["priority"];

/// A normalized record plus the validation failure it degraded from, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub record: T,
    pub issue: Option<ValidationError>,
}

impl<T> Normalized<T> {
    fn clean(record: T) -> Self {
        Self {
            record,
            issue: None,
        }
    }

    fn degraded(record: T, issue: ValidationError) -> Self {
        Self {
            record,
            issue: Some(issue),
        }
    }

    /// Strict view: the record only if it validated
    pub fn into_result(self) -> Result<T, ValidationError> {
        match self.issue {
            None => Ok(self.record),
            Some(issue) => Err(issue),
        }
    }
}

/// Normalize a booking, failing if `facility_id` is absent
pub fn normalize_booking(raw: &Value) -> Result<BookingRecord, ValidationError> {
    normalize_booking_lenient(raw).into_result()
}

/// Normalize an event, failing if `facility_id` is absent
pub fn normalize_event(raw: &Value) -> Result<EventRecord, ValidationError> {
    normalize_event_lenient(raw).into_result()
}

/// Normalize a maintenance report, failing if `priority` is absent
pub fn normalize_maintenance(raw: &Value) -> Result<MaintenanceReport, ValidationError> {
    normalize_maintenance_lenient(raw).into_result()
}

/// Normalize a booking, degrading to fallback labels instead of failing
pub fn normalize_booking_lenient(raw: &Value) -> Normalized<BookingRecord> {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    let (facility, issue) = facility_ref(obj, RecordKind::Booking);

    let status = parse_status(obj, BookingStatus::parse);
    let date = match fields::field(obj, &["date", "booking_date", "bookingDate"]) {
        Field::Present(value) => fields::text(value).and_then(|s| fields::parse_date(&s)),
        _ => None,
    };

    let record = BookingRecord {
        facility,
        status,
        date,
    };
    finish(record, not_object(raw, RecordKind::Booking).or(issue))
}

/// Normalize an event, degrading to fallback labels instead of failing
pub fn normalize_event_lenient(raw: &Value) -> Normalized<EventRecord> {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    let (facility, issue) = facility_ref(obj, RecordKind::Event);

    let status = parse_status(obj, EventStatus::parse);
    let start = fields::combine_date_time(
        present(obj, &["start_date", "startDate"]),
        present(obj, &["start_time", "startTime"]),
    );
    let end = fields::combine_date_time(
        present(obj, &["end_date", "endDate"]),
        present(obj, &["end_time", "endTime"]),
    );

    let record = EventRecord {
        facility,
        status,
        start,
        end,
    };
    finish(record, not_object(raw, RecordKind::Event).or(issue))
}

/// Normalize a maintenance report, degrading to fallback labels instead of failing
pub fn normalize_maintenance_lenient(raw: &Value) -> Normalized<MaintenanceReport> {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let (priority, issue) = match fields::field(obj, PRIORITY_KEYS) {
        Field::Absent => (
            Priority::Unknown,
            Some(ValidationError::MissingField {
                kind: RecordKind::Maintenance,
                field: "priority",
            }),
        ),
        Field::Null => (Priority::Unknown, None),
        Field::Present(value) => (
            fields::text(value)
                .map(|s| Priority::parse(&s))
                .unwrap_or(Priority::Unknown),
            None,
        ),
    };

    let status = parse_status(obj, MaintenanceStatus::parse);
    let reported_at = present(obj, &["reported_date", "reportedDate", "created_at", "createdAt"])
        .and_then(fields::text)
        .and_then(|s| fields::parse_datetime(&s));
    let completed_at = if status == MaintenanceStatus::Completed {
        present(
            obj,
            &[
                "completion_date",
                "completionDate",
                "completed_date",
                "completedDate",
                "completed_at",
                "completedAt",
            ],
        )
        .and_then(fields::text)
        .and_then(|s| fields::parse_datetime(&s))
    } else {
        None
    };

    let facility = match fields::field(obj, FACILITY_ID_KEYS) {
        Field::Present(_) => Some(facility_ref(obj, RecordKind::Maintenance).0),
        _ => None,
    };

    let record = MaintenanceReport {
        priority,
        status,
        facility,
        reported_at,
        completed_at,
    };
    finish(record, not_object(raw, RecordKind::Maintenance).or(issue))
}

/// Normalize a whole collection, keeping every record
///
/// Degraded records are counted in `report` and logged at warn level.
pub fn normalize_batch<T>(
    raws: &[Value],
    kind: RecordKind,
    normalize: impl Fn(&Value) -> Normalized<T>,
    report: &mut LoadReport,
) -> Vec<T> {
    let records: Vec<T> = raws
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let normalized = normalize(raw);
            if let Some(issue) = &normalized.issue {
                warn!(index, kind = %kind, error = %issue, "Record degraded to fallback labels");
                report.add_degraded(index, issue);
            }
            normalized.record
        })
        .collect();

    debug!(kind = %kind, count = records.len(), "Normalized collection");
    records
}

fn finish<T>(record: T, issue: Option<ValidationError>) -> Normalized<T> {
    match issue {
        None => Normalized::clean(record),
        Some(issue) => Normalized::degraded(record, issue),
    }
}

fn not_object(raw: &Value, kind: RecordKind) -> Option<ValidationError> {
    if raw.is_object() {
        None
    } else {
        Some(ValidationError::NotAnObject { kind })
    }
}

fn present<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    match fields::field(obj, aliases) {
        Field::Present(value) => Some(value),
        _ => None,
    }
}

/// Unknown or missing status text falls back to the first lifecycle state
fn parse_status<S: Default>(obj: &Map<String, Value>, parse: impl Fn(&str) -> Option<S>) -> S {
    present(obj, STATUS_KEYS)
        .and_then(fields::text)
        .and_then(|s| parse(&s))
        .unwrap_or_default()
}

/// Facility reference with fallbacks, plus the validation failure if the id
/// key is entirely absent
fn facility_ref(
    obj: &Map<String, Value>,
    kind: RecordKind,
) -> (FacilityRef, Option<ValidationError>) {
    let nested_id = fields::nested(obj, "facility", "id").and_then(fields::identifier);

    let (id, issue) = match fields::field(obj, FACILITY_ID_KEYS) {
        Field::Present(value) => (
            fields::identifier(value)
                .map(FacilityId::new)
                .unwrap_or_else(FacilityId::unknown),
            None,
        ),
        Field::Null => (FacilityId::unknown(), None),
        Field::Absent => match nested_id {
            Some(id) => (FacilityId::new(id), None),
            None => (
                FacilityId::unknown(),
                Some(ValidationError::MissingField {
                    kind,
                    field: "facility_id",
                }),
            ),
        },
    };

    let name = present(obj, FACILITY_NAME_KEYS)
        .and_then(fields::text)
        .or_else(|| fields::nested(obj, "facility", "name").and_then(fields::text))
        .unwrap_or_else(|| id.fallback_name());

    let category = present(obj, FACILITY_CATEGORY_KEYS)
        .and_then(fields::text)
        .or_else(|| fields::nested(obj, "facility", "category").and_then(fields::text));

    let mut facility = FacilityRef::from_id(id).with_name(name);
    if let Some(category) = category {
        facility = facility.with_category(category);
    }
    (facility, issue)
}
