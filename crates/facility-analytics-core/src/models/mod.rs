//! Data models for facility-analytics

pub mod aggregates;
pub mod config;
pub mod kpi;
pub mod records;
pub mod report;
pub mod values;

pub use aggregates::{
    FacilityUsage, FacilityUsageAggregate, PriorityAggregate, PriorityBreakdown, ReportRow,
};
pub use config::{FacilityFilter, PriorityFilter, ReportConfig, ReportPeriod, ReportType};
pub use kpi::{FacilityUsageKpis, KpiSet, MaintenanceKpis, SlaCompliance};
pub use records::{
    BookingRecord, BookingStatus, EventRecord, EventStatus, FacilityId, FacilityRef,
    MaintenanceReport, MaintenanceStatus, Priority, RecordKind,
};
pub use report::{ForecastPoint, ReportPayload, ReportRows};
pub use values::{MetricValue, NOT_AVAILABLE};
