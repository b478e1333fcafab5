//! KPI calculator
//!
//! Derives secondary metrics from aggregate rows. Every ratio has an explicit
//! zero-denominator branch, so no KPI is ever NaN or infinite.

use crate::models::values::round_to;
use crate::models::{
    FacilityUsageAggregate, FacilityUsageKpis, MaintenanceKpis, PriorityAggregate, SlaCompliance,
};
use crate::settings::EngineSettings;

/// Facility-usage KPIs; `None` when there are no rows to average over
///
/// `prior` is the same aggregation over the previous period. When it is
/// given and had event hours, `growth` is the percentage change in event
/// hours; otherwise growth is unavailable.
pub fn facility_usage_kpis(
    rows: &[FacilityUsageAggregate],
    prior: Option<&[FacilityUsageAggregate]>,
    settings: &EngineSettings,
) -> Option<FacilityUsageKpis> {
    if rows.is_empty() {
        return None;
    }

    let row_count = rows.len() as f64;
    let total_bookings: u64 = rows.iter().map(|r| r.bookings_count).sum();
    let total_events: u64 = rows.iter().map(|r| r.events_count).sum();
    let total_hours = round_to(rows.iter().map(|r| r.total_event_hours).sum(), 1);

    Some(FacilityUsageKpis {
        facility_count: rows.len() as u64,
        total_bookings,
        total_events,
        total_hours,
        avg_bookings_per_facility: round_to(total_bookings as f64 / row_count, 1),
        avg_events_per_facility: round_to(total_events as f64 / row_count, 1),
        avg_hours_per_facility: round_to(total_hours / row_count, 1),
        utilization: utilization(total_hours, rows.len(), settings),
        total_revenue: round_to(total_hours * settings.rates.revenue_per_hour, 2),
        growth: prior.and_then(|prior| growth(total_hours, prior)),
    })
}

/// Capacity-normalized utilization percentage, capped below saturation
///
/// `min(ceiling, round(hours / (facilities x hours_per_day x days) x 100))`
pub fn utilization(total_hours: f64, facility_count: usize, settings: &EngineSettings) -> u8 {
    let capacity = facility_count as f64
        * settings.capacity.hours_per_day
        * settings.capacity.days_per_period;
    if capacity <= 0.0 || total_hours <= 0.0 {
        return 0;
    }

    let pct = (total_hours / capacity * 100.0).round();
    let ceiling = f64::from(settings.capacity.utilization_ceiling);
    pct.clamp(0.0, ceiling) as u8
}

fn growth(current_hours: f64, prior: &[FacilityUsageAggregate]) -> Option<f64> {
    let prior_hours = round_to(prior.iter().map(|r| r.total_event_hours).sum(), 1);
    if prior_hours <= 0.0 {
        return None;
    }
    Some(round_to(
        (current_hours - prior_hours) / prior_hours * 100.0,
        1,
    ))
}

/// Maintenance KPIs; defined for zero rows (all counts 0, averages "N/A")
pub fn maintenance_kpis(rows: &[PriorityAggregate], settings: &EngineSettings) -> MaintenanceKpis {
    let total_reports: u64 = rows.iter().map(|r| r.count).sum();
    let total_resolved: u64 = rows.iter().map(|r| r.resolved).sum();

    let resolution_rate = if total_reports == 0 {
        0
    } else {
        (total_resolved as f64 / total_reports as f64 * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    };

    let avg_resolution_time = if total_resolved == 0 {
        None
    } else {
        let weighted: f64 = rows
            .iter()
            .filter(|r| r.resolved > 0)
            .map(|r| r.avg_resolution_hours() * r.resolved as f64)
            .sum();
        Some(round_to(weighted / total_resolved as f64, 1))
    };

    let sla_compliance: Vec<SlaCompliance> = rows.iter().map(sla_compliance).collect();

    let measured: Vec<f64> = rows
        .iter()
        .zip(&sla_compliance)
        .filter(|(row, _)| row.resolved > 0)
        .map(|(_, sla)| sla.compliance)
        .collect();
    let overall_sla_compliance = if measured.is_empty() {
        None
    } else {
        Some(round_to(
            measured.iter().sum::<f64>() / measured.len() as f64,
            1,
        ))
    };

    MaintenanceKpis {
        total_reports,
        total_resolved,
        pending: total_reports.saturating_sub(total_resolved),
        resolution_rate,
        avg_resolution_time,
        total_cost: round_to(total_reports as f64 * settings.rates.cost_per_report, 2),
        sla_compliance,
        overall_sla_compliance,
    }
}

/// SLA compliance of one priority group
///
/// 100 when the group's mean resolution time is within the target (including
/// groups with nothing resolved yet), otherwise `target / avg x 100`.
pub fn sla_compliance(row: &PriorityAggregate) -> SlaCompliance {
    let avg = row.avg_resolution_hours();
    let target = row.sla_target_hours();

    let compliance = if avg <= target {
        100.0
    } else {
        round_to(target / avg * 100.0, 1)
    };

    SlaCompliance {
        priority: row.priority,
        avg_resolution_hours: round_to(avg, 2),
        target_hours: target,
        compliance,
    }
}
