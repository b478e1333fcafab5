//! Canonical record shapes produced by the normalizer
//!
//! Booking, event and maintenance records as fetched from the portal API are
//! loosely typed; everything in this module is the typed form the aggregators
//! consume. Status and priority text become closed enums here.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of raw record handed to the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Booking,
    Event,
    Maintenance,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Booking => "booking",
            RecordKind::Event => "event",
            RecordKind::Maintenance => "maintenance",
        })
    }
}

/// Facility identifier (numeric ids are kept in their integer text form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(String);

impl FacilityId {
    /// Sentinel id for records with no facility reference at all
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Fallback display name used when the record carries no facility name
    pub fn fallback_name(&self) -> String {
        format!("Facility {}", self.0)
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacilityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Facility reference carried by bookings and events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRef {
    pub id: FacilityId,
    pub name: String,
    pub category: Option<String>,
}

impl FacilityRef {
    /// Reference with the fallback name and no category
    pub fn from_id(id: FacilityId) -> Self {
        let name = id.fallback_name();
        Self {
            id,
            name,
            category: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Case-insensitive parse; `None` for unrecognized text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" | "confirmed" => Some(Self::Approved),
            "rejected" | "denied" => Some(Self::Rejected),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Event lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" | "confirmed" | "scheduled" => Some(Self::Approved),
            "rejected" | "denied" => Some(Self::Rejected),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Maintenance report lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Reported,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "reported" | "pending" | "open" => Some(Self::Reported),
            "in_progress" | "assigned" => Some(Self::InProgress),
            "completed" | "resolved" | "closed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Maintenance priority level
///
/// Parsing never fails: anything that is not one of the four known levels
/// becomes `Unknown`, which still has an SLA target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Priority {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }

    /// Resolution-time ceiling in hours for SLA compliance
    pub fn sla_target_hours(&self) -> f64 {
        match self {
            Priority::Critical => 24.0,
            Priority::High => 48.0,
            Priority::Medium => 72.0,
            Priority::Low => 120.0,
            Priority::Unknown => 72.0,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A facility booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub facility: FacilityRef,
    pub status: BookingStatus,
    pub date: Option<NaiveDate>,
}

/// An event held at a facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub facility: FacilityRef,
    pub status: EventStatus,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl EventRecord {
    /// Event length in hours, clamped to zero
    ///
    /// Missing endpoints contribute nothing; an end before the start is a
    /// data-entry error and counts as zero rather than negative time.
    pub fn duration_hours(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => hours_between(start, end),
            _ => 0.0,
        }
    }
}

/// A maintenance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub priority: Priority,
    pub status: MaintenanceStatus,
    pub facility: Option<FacilityRef>,
    pub reported_at: Option<NaiveDateTime>,
    /// Only set when `status` is `Completed`
    pub completed_at: Option<NaiveDateTime>,
}

impl MaintenanceReport {
    /// Resolution time in hours when the report is completed and both
    /// timestamps are known
    pub fn resolution_hours(&self) -> Option<f64> {
        if self.status != MaintenanceStatus::Completed {
            return None;
        }
        match (self.reported_at, self.completed_at) {
            (Some(reported), Some(completed)) => Some(hours_between(reported, completed)),
            _ => None,
        }
    }
}

/// Non-negative hours from `start` to `end`
pub(crate) fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let seconds = end.signed_duration_since(start).num_seconds();
    (seconds as f64 / 3600.0).max(0.0)
}
