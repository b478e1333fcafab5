//! Aggregate rows: per-facility usage and per-priority maintenance summaries

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::records::{FacilityId, Priority};
use super::values::MetricValue;

/// Per-facility usage, keyed by facility id in first-seen order
pub type FacilityUsage = IndexMap<FacilityId, FacilityUsageAggregate>;

/// Per-priority maintenance breakdown, keyed by priority in first-seen order
pub type PriorityBreakdown = IndexMap<Priority, PriorityAggregate>;

/// Booking and event activity for one facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityUsageAggregate {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub bookings_count: u64,
    pub events_count: u64,
    /// Hours of events, rounded to 2 decimals (always >= 0)
    pub total_event_hours: f64,
}

impl FacilityUsageAggregate {
    pub fn new(facility_id: FacilityId, facility_name: impl Into<String>) -> Self {
        Self {
            facility_id,
            facility_name: facility_name.into(),
            bookings_count: 0,
            events_count: 0,
            total_event_hours: 0.0,
        }
    }
}

/// Report and resolution counts for one priority level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAggregate {
    pub priority: Priority,
    pub count: u64,
    /// Completed reports with both timestamps (never exceeds `count`)
    pub resolved: u64,
    /// Hours from report to completion summed over resolved reports
    pub total_resolution_hours: f64,
}

impl PriorityAggregate {
    pub fn new(priority: Priority) -> Self {
        Self {
            priority,
            count: 0,
            resolved: 0,
            total_resolution_hours: 0.0,
        }
    }

    /// Mean resolution time of this group, 0 when nothing was resolved
    pub fn avg_resolution_hours(&self) -> f64 {
        if self.resolved == 0 {
            0.0
        } else {
            self.total_resolution_hours / self.resolved as f64
        }
    }

    pub fn sla_target_hours(&self) -> f64 {
        self.priority.sla_target_hours()
    }
}

/// A row that exporters can flatten into named cells
///
/// Field order is the column order of CSV and table exports.
pub trait ReportRow {
    fn fields(&self) -> Vec<(&'static str, MetricValue)>;
}

impl ReportRow for FacilityUsageAggregate {
    fn fields(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("facility_id", MetricValue::text(self.facility_id.as_str())),
            ("facility_name", MetricValue::text(&self.facility_name)),
            ("bookings_count", MetricValue::from(self.bookings_count)),
            ("events_count", MetricValue::from(self.events_count)),
            ("total_event_hours", MetricValue::from(self.total_event_hours)),
        ]
    }
}

impl ReportRow for PriorityAggregate {
    fn fields(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("priority", MetricValue::text(self.priority.as_str())),
            ("count", MetricValue::from(self.count)),
            ("resolved", MetricValue::from(self.resolved)),
            (
                "total_resolution_hours",
                MetricValue::from(self.total_resolution_hours),
            ),
        ]
    }
}
