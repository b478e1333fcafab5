//! Derived KPI sets for the two report profiles

use serde::{Deserialize, Serialize, Serializer};

use super::records::Priority;
use super::values::{format_one_decimal, MetricValue, NOT_AVAILABLE};

/// KPIs derived from facility usage rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityUsageKpis {
    pub facility_count: u64,
    pub total_bookings: u64,
    pub total_events: u64,
    /// Rounded to 1 decimal
    pub total_hours: f64,
    pub avg_bookings_per_facility: f64,
    pub avg_events_per_facility: f64,
    pub avg_hours_per_facility: f64,
    /// Capacity-normalized percentage, 0..=98
    pub utilization: u8,
    pub total_revenue: f64,
    /// Percentage change in event hours versus the prior period
    #[serde(serialize_with = "serialize_or_na")]
    pub growth: Option<f64>,
}

impl FacilityUsageKpis {
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("facility_count", MetricValue::from(self.facility_count)),
            ("total_bookings", MetricValue::from(self.total_bookings)),
            ("total_events", MetricValue::from(self.total_events)),
            ("total_hours", MetricValue::from(self.total_hours)),
            (
                "avg_bookings_per_facility",
                MetricValue::from(self.avg_bookings_per_facility),
            ),
            (
                "avg_events_per_facility",
                MetricValue::from(self.avg_events_per_facility),
            ),
            (
                "avg_hours_per_facility",
                MetricValue::from(self.avg_hours_per_facility),
            ),
            ("utilization", MetricValue::from(u32::from(self.utilization))),
            ("total_revenue", MetricValue::from(self.total_revenue)),
            ("growth", MetricValue::number_or_na(self.growth)),
        ]
    }
}

/// SLA compliance of one priority group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaCompliance {
    pub priority: Priority,
    pub avg_resolution_hours: f64,
    pub target_hours: f64,
    /// Percentage in 0..=100, rounded to 1 decimal
    pub compliance: f64,
}

impl SlaCompliance {
    pub fn is_met(&self) -> bool {
        self.avg_resolution_hours <= self.target_hours
    }
}

/// KPIs derived from maintenance priority rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceKpis {
    pub total_reports: u64,
    pub total_resolved: u64,
    pub pending: u64,
    /// Percentage, 0..=100
    pub resolution_rate: u8,
    /// Mean hours to resolve, 1 decimal; `None` when nothing was resolved
    #[serde(serialize_with = "serialize_or_na")]
    pub avg_resolution_time: Option<f64>,
    pub total_cost: f64,
    /// One entry per priority row, in row order
    pub sla_compliance: Vec<SlaCompliance>,
    #[serde(serialize_with = "serialize_or_na")]
    pub overall_sla_compliance: Option<f64>,
}

impl MaintenanceKpis {
    /// "48.0" style label, or "N/A"
    pub fn avg_resolution_time_label(&self) -> String {
        self.avg_resolution_time
            .map(format_one_decimal)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn compliance_for(&self, priority: Priority) -> Option<&SlaCompliance> {
        self.sla_compliance.iter().find(|c| c.priority == priority)
    }

    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("total_reports", MetricValue::from(self.total_reports)),
            ("total_resolved", MetricValue::from(self.total_resolved)),
            ("pending", MetricValue::from(self.pending)),
            (
                "resolution_rate",
                MetricValue::from(u32::from(self.resolution_rate)),
            ),
            (
                "avg_resolution_time",
                MetricValue::text(self.avg_resolution_time_label()),
            ),
            ("total_cost", MetricValue::from(self.total_cost)),
            (
                "overall_sla_compliance",
                MetricValue::number_or_na(self.overall_sla_compliance),
            ),
        ]
    }
}

/// KPI set of a report, one variant per profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "profile", rename_all = "kebab-case")]
pub enum KpiSet {
    FacilityUsage(FacilityUsageKpis),
    Maintenance(MaintenanceKpis),
}

impl KpiSet {
    /// Flattened `(name, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        match self {
            KpiSet::FacilityUsage(kpis) => kpis.entries(),
            KpiSet::Maintenance(kpis) => kpis.entries(),
        }
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn as_facility_usage(&self) -> Option<&FacilityUsageKpis> {
        match self {
            KpiSet::FacilityUsage(kpis) => Some(kpis),
            KpiSet::Maintenance(_) => None,
        }
    }

    pub fn as_maintenance(&self) -> Option<&MaintenanceKpis> {
        match self {
            KpiSet::Maintenance(kpis) => Some(kpis),
            KpiSet::FacilityUsage(_) => None,
        }
    }
}

fn serialize_or_na<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}
