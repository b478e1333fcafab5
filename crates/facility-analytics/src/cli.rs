//! CLI helpers: argument parsing and terminal rendering
//!
//! Turns command-line selections into engine inputs and renders payloads as
//! comfy-table tables, JSON, CSV, or Markdown.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Row, Table};
use facility_analytics_core::models::{ForecastPoint, KpiSet, MetricValue, ReportPayload};
use facility_analytics_core::{report_to_csv, report_to_markdown};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Output Format
// ============================================================================

/// Output format for report and forecast commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// File extension used when writing to a directory
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("Unknown format '{}' (expected: table, json, csv, markdown)", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected: YYYY-MM-DD)", s))
}

/// Parse a comma-separated history series: "120,135,150"
pub fn parse_history(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let value = part
                .parse::<f64>()
                .with_context(|| format!("Invalid history value '{}'", part))?;
            if !value.is_finite() {
                bail!("History value '{}' is not a finite number", part);
            }
            Ok(value)
        })
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a payload in the requested format
pub fn render_report(
    payload: &ReportPayload,
    format: OutputFormat,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_report_table(payload, no_color)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(payload).context("Failed to serialize report to JSON")
        }
        OutputFormat::Csv => Ok(report_to_csv(payload)),
        OutputFormat::Markdown => Ok(report_to_markdown(payload)),
    }
}

/// Terminal rendering: title, KPI table, rows table, forecast table
pub fn format_report_table(payload: &ReportPayload, no_color: bool) -> String {
    let mut out = String::new();
    out.push_str(payload.title());
    out.push('\n');
    out.push_str(&format!("Period: {}\n\n", payload.period()));

    match payload.kpis() {
        Some(kpis) => {
            out.push_str(&format_kpi_table(kpis, no_color));
            out.push_str("\n\n");
        }
        None => out.push_str("No data for this period.\n\n"),
    }

    let rows = payload.rows().flattened();
    if let Some(first) = rows.first() {
        let mut table = new_table();
        table.set_header(header(
            &first.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            no_color,
        ));
        for row in &rows {
            table.add_row(Row::from(row.iter().map(|(_, value)| value_cell(value))));
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    if let Some(forecast) = payload.forecast().filter(|f| !f.is_empty()) {
        out.push('\n');
        out.push_str(&format_forecast_table(forecast, no_color));
        out.push('\n');
    }

    out
}

fn format_kpi_table(kpis: &KpiSet, no_color: bool) -> String {
    let mut table = new_table();
    table.set_header(header(&["Metric", "Value"], no_color));
    for (name, value) in kpis.entries() {
        table.add_row(Row::from(vec![Cell::new(name), value_cell(&value)]));
    }

    if let Some(maintenance) = kpis.as_maintenance() {
        for sla in &maintenance.sla_compliance {
            let label = format!("sla_compliance[{}]", sla.priority.as_str());
            let value =
                Cell::new(format!("{}%", sla.compliance)).set_alignment(CellAlignment::Right);
            let value = if no_color {
                value
            } else if sla.is_met() {
                value.fg(Color::Green)
            } else {
                value.fg(Color::Red)
            };
            table.add_row(Row::from(vec![Cell::new(label), value]));
        }
    }

    table.to_string()
}

/// Forecast as a table of period, projected value, and bounds
pub fn format_forecast_table(points: &[ForecastPoint], no_color: bool) -> String {
    if points.is_empty() {
        return "No forecast periods.".to_string();
    }

    let mut table = new_table();
    table.set_header(header(&["Period", "Projected", "Lower", "Upper"], no_color));
    for point in points {
        table.add_row(Row::from(vec![
            Cell::new(&point.period_label),
            Cell::new(point.projected).set_alignment(CellAlignment::Right),
            Cell::new(point.lower_bound).set_alignment(CellAlignment::Right),
            Cell::new(point.upper_bound).set_alignment(CellAlignment::Right),
        ]));
    }
    table.to_string()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(names: &[&str], no_color: bool) -> Vec<Cell> {
    names
        .iter()
        .map(|name| {
            let cell = Cell::new(name);
            if no_color {
                cell
            } else {
                cell.fg(Color::Cyan)
            }
        })
        .collect()
}

fn value_cell(value: &MetricValue) -> Cell {
    let cell = Cell::new(value.to_string());
    if value.is_text() {
        cell
    } else {
        cell.set_alignment(CellAlignment::Right)
    }
}

// ============================================================================
// Tests
// ============================================================================
