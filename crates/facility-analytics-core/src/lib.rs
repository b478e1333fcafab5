//! facility-analytics-core - Core library for facility-analytics
//!
//! Provides record normalization, usage and maintenance aggregation, KPIs,
//! forecasting, report assembly, and exporters for facility operations data.

pub mod analytics;
pub mod error;
pub mod export;
pub mod models;
pub mod parsers;
pub mod settings;

pub use analytics::{generate_report, ForecastRequest, GeneratedReport};
pub use error::{CoreError, LoadReport, ValidationError};
pub use export::{
    csv_filename, export_report_to_csv, export_report_to_json, export_report_to_markdown,
    report_to_csv, report_to_markdown,
};
pub use parsers::{CollectionLoader, CollectionSource, NormalizedCollections};
pub use settings::EngineSettings;
