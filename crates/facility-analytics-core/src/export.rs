//! Export functionality for report payloads
//!
//! CSV mirrors the report table (one line per aggregate row), JSON is the
//! serialized payload, and Markdown is a printable summary with KPI, row and
//! forecast tables.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{KpiSet, MetricValue, ReportPayload, ReportType};

// ============================================================================
// CSV Export
// ============================================================================

/// Render the report rows as CSV text
///
/// The header is the field names of the first row in encounter order. Text
/// cells are double-quoted with embedded quotes doubled; numbers are written
/// bare. A report with no rows renders as an empty string.
///
/// # Examples
///
/// ```
/// use facility_analytics_core::export::report_to_csv;
/// use facility_analytics_core::models::{
///     FacilityId, FacilityUsageAggregate, ReportPayload, ReportRows,
/// };
///
/// let mut gym = FacilityUsageAggregate::new(FacilityId::new("1"), "Gym");
/// gym.bookings_count = 2;
/// let payload = ReportPayload::assemble(
///     "Facility Usage Report",
///     "2024-01-01 to 2024-01-31",
///     ReportRows::FacilityUsage(vec![gym]),
///     None,
///     None,
/// );
///
/// let csv = report_to_csv(&payload);
/// assert_eq!(
///     csv,
///     "facility_id,facility_name,bookings_count,events_count,total_event_hours\n\
///      \"1\",\"Gym\",2,0,0"
/// );
/// ```
pub fn report_to_csv(payload: &ReportPayload) -> String {
    let rows = payload.rows().flattened();
    let Some(first) = rows.first() else {
        return String::new();
    };

    let header = first
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",");

    let lines = rows.iter().map(|row| {
        row.iter()
            .map(|(_, value)| csv_cell(value))
            .collect::<Vec<_>>()
            .join(",")
    });

    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_cell(value: &MetricValue) -> String {
    match value {
        MetricValue::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        other => other.to_string(),
    }
}

/// Write the CSV rendering of `payload` to `path`
///
/// # Errors
/// Returns error if directory creation or the file write fails
pub fn export_report_to_csv(payload: &ReportPayload, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    std::fs::write(path, report_to_csv(payload))
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    Ok(())
}

/// `{reportType}-report-{YYYYMMDDHHMMSS}.csv`
pub fn csv_filename(report_type: ReportType, at: DateTime<Utc>) -> String {
    format!(
        "{}-report-{}.csv",
        report_type.as_str(),
        at.format("%Y%m%d%H%M%S")
    )
}

// ============================================================================
// JSON Export
// ============================================================================

/// Write the payload as pretty-printed JSON
pub fn export_report_to_json(payload: &ReportPayload, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let json =
        serde_json::to_string_pretty(payload).context("Failed to serialize report to JSON")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    Ok(())
}

// ============================================================================
// Markdown Export
// ============================================================================

/// Render the payload as a Markdown summary
pub fn report_to_markdown(payload: &ReportPayload) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# {}\n", payload.title());
    let _ = writeln!(md, "**Period:** {}\n", payload.period());

    match payload.kpis() {
        Some(kpis) => write_kpis(&mut md, kpis),
        None => md.push_str("_No data for this period._\n\n"),
    }

    let rows = payload.rows().flattened();
    if let Some(first) = rows.first() {
        md.push_str("## Breakdown\n\n");
        let headers: Vec<&str> = first.iter().map(|(name, _)| *name).collect();
        let _ = writeln!(md, "| {} |", headers.join(" | "));
        let _ = writeln!(md, "|{}", "---|".repeat(headers.len()));
        for row in &rows {
            let cells: Vec<String> = row.iter().map(|(_, v)| md_cell(&v.to_string())).collect();
            let _ = writeln!(md, "| {} |", cells.join(" | "));
        }
        md.push('\n');
    }

    if let Some(forecast) = payload.forecast().filter(|f| !f.is_empty()) {
        md.push_str("## Forecast\n\n");
        md.push_str("| Period | Projected | Lower | Upper |\n");
        md.push_str("|---|---:|---:|---:|\n");
        for point in forecast {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                md_cell(&point.period_label),
                point.projected,
                point.lower_bound,
                point.upper_bound
            );
        }
        md.push('\n');
    }

    md
}

fn write_kpis(md: &mut String, kpis: &KpiSet) {
    md.push_str("## Key metrics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|---|---:|\n");
    for (name, value) in kpis.entries() {
        let _ = writeln!(md, "| {} | {} |", name, md_cell(&value.to_string()));
    }
    md.push('\n');

    if let Some(maintenance) = kpis.as_maintenance() {
        if !maintenance.sla_compliance.is_empty() {
            md.push_str("### SLA compliance\n\n");
            md.push_str("| Priority | Avg hours | Target hours | Compliance | Met |\n");
            md.push_str("|---|---:|---:|---:|---|\n");
            for sla in &maintenance.sla_compliance {
                let _ = writeln!(
                    md,
                    "| {} | {} | {} | {}% | {} |",
                    sla.priority.as_str(),
                    sla.avg_resolution_hours,
                    sla.target_hours,
                    sla.compliance,
                    if sla.is_met() { "yes" } else { "no" }
                );
            }
            md.push('\n');
        }
    }
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Write the Markdown summary of `payload` to `path`
pub fn export_report_to_markdown(payload: &ReportPayload, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create Markdown file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(report_to_markdown(payload).as_bytes())
        .context("Failed to write Markdown report")?;
    writer.flush().context("Failed to flush Markdown writer")?;

    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
