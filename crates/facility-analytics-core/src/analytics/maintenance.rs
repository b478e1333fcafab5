//! Maintenance aggregation by priority
//!
//! Groups reports by normalized priority in first-seen order. Only completed
//! reports with both timestamps count as resolved, so `resolved <= count`
//! holds for every row.

use indexmap::IndexMap;

use crate::models::values::round_to;
use crate::models::{MaintenanceReport, PriorityAggregate, PriorityBreakdown, PriorityFilter};

/// Aggregate maintenance reports passing `filter` by priority
pub fn aggregate_by_priority(
    reports: &[MaintenanceReport],
    filter: PriorityFilter,
) -> PriorityBreakdown {
    let mut breakdown: PriorityBreakdown = IndexMap::new();

    for report in reports.iter().filter(|r| filter.matches(r.priority)) {
        let row = breakdown
            .entry(report.priority)
            .or_insert_with(|| PriorityAggregate::new(report.priority));
        row.count += 1;

        if let Some(hours) = report.resolution_hours() {
            row.resolved += 1;
            row.total_resolution_hours += hours;
        }
    }

    for row in breakdown.values_mut() {
        row.total_resolution_hours = round_to(row.total_resolution_hours, 2);
    }

    tracing::debug!(
        priorities = breakdown.len(),
        reports = reports.len(),
        "Aggregated maintenance by priority"
    );
    breakdown
}
