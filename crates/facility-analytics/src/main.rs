//! facility-analytics - Facility operations reports from the command line

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facility_analytics_core::analytics::{forecast, ForecastParams, PeriodLabels};
use facility_analytics_core::models::{
    FacilityFilter, FacilityId, PriorityFilter, ReportConfig, ReportPeriod, ReportType,
};
use facility_analytics_core::settings::SETTINGS_FILE_NAME;
use facility_analytics_core::{
    csv_filename, export_report_to_csv, export_report_to_json, export_report_to_markdown,
    generate_report, CollectionLoader, CollectionSource, EngineSettings, ForecastRequest,
    LoadReport,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{format_forecast_table, parse_date, parse_history, render_report, OutputFormat};

const MAX_PRINTED_WARNINGS: usize = 10;

#[derive(Parser)]
#[command(
    name = "facility-analytics",
    version,
    about = "Facility operations analytics: usage, maintenance and forecast reports",
    long_about = "Aggregates facility bookings, events and maintenance reports into\n\
                  usage and maintenance reports with KPIs and trend forecasts.\n\
                  \n\
                  Examples:\n\
                    facility-analytics report --type facility-usage --data-dir ./data \\\n\
                        --start 2024-01-01 --end 2024-01-31\n\
                    facility-analytics report --type maintenance --input export.json \\\n\
                        --start 2024-01-01 --end 2024-03-31 --priority high --format csv\n\
                    facility-analytics forecast --baseline 180 --trend 8 --horizon 6\n\
                  \n\
                  Environment Variables:\n\
                    FACILITY_ANALYTICS_SETTINGS      # Engine settings file (TOML)\n\
                    FACILITY_ANALYTICS_FORMAT        # Output format: table|json|csv|markdown\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Engine settings file (default: <config dir>/facility-analytics/settings.toml)
    #[arg(long, global = true, env = "FACILITY_ANALYTICS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Output format (table|json|csv|markdown)
    #[arg(long, global = true, env = "FACILITY_ANALYTICS_FORMAT", default_value = "table")]
    format: OutputFormat,

    /// Disable ANSI colors in tables
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a facility-usage or maintenance report
    Report {
        /// Report type: facility-usage | maintenance
        #[arg(long = "type", short = 't')]
        report_type: ReportType,
        /// Directory holding bookings.json, events.json and maintenance.json
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        data_dir: Option<PathBuf>,
        /// Single JSON document with bookings, events and maintenance_reports
        #[arg(long)]
        input: Option<PathBuf>,
        /// First day of the period (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: chrono::NaiveDate,
        /// Last day of the period (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: chrono::NaiveDate,
        /// Facility category filter (usage reports)
        #[arg(long)]
        category: Option<String>,
        /// Specific facility id (usage reports)
        #[arg(long)]
        facility: Option<String>,
        /// Priority filter (maintenance reports)
        #[arg(long)]
        priority: Option<String>,
        /// Explicit forecast history: N,N,...
        #[arg(long)]
        history: Option<String>,
        /// Forecast horizon in periods (enables the forecast)
        #[arg(long, allow_negative_numbers = true)]
        horizon: Option<i64>,
        /// Write to this file instead of stdout (a directory gets a generated name)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Project a linear trend with confidence bounds
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        baseline: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        trend: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        horizon: Option<i64>,
        /// Absolute widening of both bounds
        #[arg(long)]
        variance: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Report {
            report_type,
            data_dir,
            input,
            start,
            end,
            category,
            facility,
            priority,
            history,
            horizon,
            output,
        } => {
            let source = match (data_dir, input) {
                (Some(dir), _) => CollectionSource::Directory(dir),
                (None, Some(file)) => CollectionSource::Combined(file),
                (None, None) => anyhow::bail!("Either --data-dir or --input is required"),
            };

            let mut facility_filter = FacilityFilter::all();
            if let Some(category) = category {
                facility_filter = facility_filter.category(category);
            }
            if let Some(id) = facility {
                facility_filter = facility_filter.facility(&FacilityId::new(id));
            }

            let config = ReportConfig::new(report_type, ReportPeriod::new(start, end)?)
                .with_facility_filter(facility_filter)
                .with_priority_filter(
                    priority
                        .as_deref()
                        .map(PriorityFilter::from)
                        .unwrap_or_default(),
                );

            let history = history.as_deref().map(parse_history).transpose()?;
            let request = horizon.map(|horizon| {
                let request = ForecastRequest::new(horizon);
                match history {
                    Some(history) => request.with_history(history),
                    None => request.with_labels(PeriodLabels::MonthsAfter(end)),
                }
            });

            run_report(
                config,
                source,
                settings,
                request,
                cli.format,
                output,
                cli.no_color,
            )
            .await?;
        }
        Command::Forecast {
            baseline,
            trend,
            horizon,
            variance,
        } => {
            let defaults = &settings.forecast;
            let params = ForecastParams::new(
                baseline.unwrap_or(defaults.baseline),
                trend.unwrap_or(defaults.trend),
            )
            .with_variance(variance.unwrap_or(defaults.variance));
            let points = forecast(
                params,
                horizon.unwrap_or(i64::from(defaults.horizon)),
                PeriodLabels::Relative,
            );

            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&points).context("Failed to serialize forecast")?
                ),
                _ => println!("{}", format_forecast_table(&points, cli.no_color)),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("facility-analytics").join(SETTINGS_FILE_NAME))
}

fn load_settings(explicit: Option<&Path>) -> Result<EngineSettings> {
    match explicit {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading engine settings");
            EngineSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
        None => Ok(default_settings_path()
            .map(|path| EngineSettings::load_or_default(&path))
            .unwrap_or_default()),
    }
}

async fn run_report(
    config: ReportConfig,
    source: CollectionSource,
    settings: EngineSettings,
    request: Option<ForecastRequest>,
    format: OutputFormat,
    output: Option<PathBuf>,
    no_color: bool,
) -> Result<()> {
    let mut load_report = LoadReport::new();
    let collections = CollectionLoader::new()
        .load_normalized(&source, &mut load_report)
        .await
        .context("Failed to load collections")?;
    tracing::debug!(
        records = load_report.records_loaded(),
        degraded = load_report.records_degraded,
        "Collections loaded"
    );

    let warning_count = load_report.warnings().count();
    for warning in load_report.warnings().take(MAX_PRINTED_WARNINGS) {
        eprintln!("warning: {}: {}", warning.source, warning.message);
    }
    if warning_count > MAX_PRINTED_WARNINGS {
        eprintln!("warning: ... and {} more", warning_count - MAX_PRINTED_WARNINGS);
    }

    let report = generate_report(&config, &collections, &settings, request.as_ref());
    let payload = &report.payload;

    match output {
        None => println!("{}", render_report(payload, format, no_color)?),
        Some(path) => {
            let path = if path.is_dir() {
                let name = match format {
                    OutputFormat::Csv => csv_filename(config.report_type, chrono::Utc::now()),
                    other => format!("{}-report.{}", config.report_type, other.extension()),
                };
                path.join(name)
            } else {
                path
            };

            match format {
                OutputFormat::Csv => export_report_to_csv(payload, &path)?,
                OutputFormat::Json => export_report_to_json(payload, &path)?,
                OutputFormat::Markdown => export_report_to_markdown(payload, &path)?,
                OutputFormat::Table => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent).with_context(|| {
                            format!("Failed to create directory: {}", parent.display())
                        })?;
                    }
                    std::fs::write(&path, render_report(payload, format, true)?)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }
            println!("Wrote {} ({} rows)", path.display(), payload.rows().len());
        }
    }

    Ok(())
}
