//! Engine settings: rates, capacity basis and forecast defaults
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! portal's built-in constants.
//!
//! ```toml
//! [rates]
//! revenue_per_hour = 75.0
//! cost_per_report = 150.0
//!
//! [capacity]
//! hours_per_day = 12.0
//! days_per_period = 30.0
//! utilization_ceiling = 98
//!
//! [forecast]
//! baseline = 180.0
//! trend = 8.0
//! variance = 0.0
//! horizon = 6
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::CoreError;

/// File name looked up inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Simulated money figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSettings {
    /// Revenue per booked event hour
    pub revenue_per_hour: f64,
    /// Flat cost per maintenance report
    pub cost_per_report: f64,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            revenue_per_hour: 75.0,
            cost_per_report: 150.0,
        }
    }
}

/// Capacity basis for utilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySettings {
    /// Bookable hours per facility per day
    pub hours_per_day: f64,
    /// Days in one reporting period
    pub days_per_period: f64,
    /// Utilization never reported above this percentage
    pub utilization_ceiling: u8,
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            hours_per_day: 12.0,
            days_per_period: 30.0,
            utilization_ceiling: 98,
        }
    }
}

/// Synthetic baseline used when no historical series is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub baseline: f64,
    pub trend: f64,
    /// Fixed widening applied to both bounds
    pub variance: f64,
    /// Default number of projected periods
    pub horizon: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            baseline: 180.0,
            trend: 8.0,
            variance: 0.0,
            horizon: 6,
        }
    }
}

/// All tunables of the analytics engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub rates: RateSettings,
    pub capacity: CapacitySettings,
    pub forecast: ForecastSettings,
}

impl EngineSettings {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, CoreError> {
        toml::from_str(content).map_err(|e| CoreError::SettingsParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
            source: e,
        })
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "Loaded engine settings");
                Self::from_toml(&content, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(CoreError::from_io(path, e)),
        }
    }

    /// Load settings, falling back to defaults on any error (graceful degradation)
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable settings, using defaults");
            Self::default()
        })
    }

    /// Persist settings as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}
