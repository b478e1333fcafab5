//! Error types for facility-analytics-core
//!
//! Provides a thiserror hierarchy plus a load report for graceful degradation:
//! malformed records and missing collections are recorded, never fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::RecordKind;

/// Validation failure raised by the record normalizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required identifying key is entirely absent from the raw record
    #[error("{kind} record is missing required field '{field}'")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    /// The raw record is not a JSON object at all
    #[error("{kind} record is not an object")]
    NotAnObject { kind: RecordKind },
}

/// Core error type for facility-analytics operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Record Errors
    // ===================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse settings in {path}: {message}")]
    SettingsParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Expected a JSON array for '{collection}' in {path}")]
    NotACollection { path: PathBuf, collection: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    /// Map an IO error on `path`, distinguishing a missing file
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            CoreError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CoreError::FileRead {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// How much a load problem cost the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Data degraded to a fallback (empty collection, sentinel label)
    Warning,
    /// Data was lost
    Error,
}

/// One entry in a [`LoadReport`]
#[derive(Debug, Clone)]
pub struct LoadError {
    /// Collection name or record position
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
    pub suggestion: Option<String>,
}

impl LoadError {
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Warning,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Describe a [`CoreError`] hit while reading `collection`
    pub fn from_core_error(collection: impl Into<String>, error: &CoreError) -> Self {
        let (message, suggestion, severity) = match error {
            CoreError::FileNotFound { path } => (
                format!("{} not found, using an empty collection", path.display()),
                Some("Export the collection from the portal into the data directory".to_string()),
                ErrorSeverity::Warning,
            ),
            CoreError::Validation(e) => (e.to_string(), None, ErrorSeverity::Warning),
            CoreError::JsonParse { path, message, .. } => (
                format!("Invalid JSON in {}: {}", path.display(), message),
                None,
                ErrorSeverity::Error,
            ),
            other => (other.to_string(), None, ErrorSeverity::Error),
        };

        Self {
            source: collection.into(),
            message,
            severity,
            suggestion,
        }
    }
}

/// Problems met while loading and normalizing collections
///
/// Nothing recorded here aborts a report: missing collections are empty and
/// degraded records are aggregated under fallback labels.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub bookings_loaded: usize,
    pub events_loaded: usize,
    pub maintenance_loaded: usize,
    /// Records that failed validation but were kept with fallback labels
    pub records_degraded: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Record a validation failure for a record that was kept anyway
    pub fn add_degraded(&mut self, index: usize, error: &ValidationError) {
        self.records_degraded += 1;
        self.errors.push(
            LoadError::warning(format!("record #{}", index), error.to_string())
                .with_suggestion("Record aggregated under fallback labels"),
        );
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LoadError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Warning)
    }

    /// Total records normalized across the three collections
    pub fn records_loaded(&self) -> usize {
        self.bookings_loaded + self.events_loaded + self.maintenance_loaded
    }
}
