//! Reporting configuration as sent by the report page
//!
//! Deserializes from the camelCase JSON shape
//! `{reportType, period: {start, end}, facilityFilter?, priorityFilter?}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::records::{FacilityId, Priority};
use crate::error::CoreError;

/// Which report profile to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    FacilityUsage,
    Maintenance,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::FacilityUsage => "facility-usage",
            ReportType::Maintenance => "maintenance",
        }
    }

    /// Default report title
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::FacilityUsage => "Facility Usage Report",
            ReportType::Maintenance => "Maintenance Report",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facility-usage" | "facility_usage" | "usage" => Ok(ReportType::FacilityUsage),
            "maintenance" => Ok(ReportType::Maintenance),
            other => Err(CoreError::InvalidConfig {
                message: format!(
                    "unknown report type '{}' (expected facility-usage or maintenance)",
                    other
                ),
            }),
        }
    }
}

/// Inclusive calendar range a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::InvalidConfig {
                message: format!("period ends ({}) before it starts ({})", end, start),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered (inclusive)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The period of equal length immediately before this one
    pub fn previous(&self) -> Self {
        let length = chrono::Duration::days(self.days());
        Self {
            start: self.start - length,
            end: self.end - length,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Category / specific-facility inclusion filter for usage reports
///
/// `None`, empty and "all" (any case) impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub specific_facility: Option<String>,
}

impl FacilityFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn facility(mut self, id: &FacilityId) -> Self {
        self.specific_facility = Some(id.as_str().to_string());
        self
    }
}

/// Priority filter for maintenance reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => *wanted == priority,
        }
    }
}

impl From<String> for PriorityFilter {
    fn from(s: String) -> Self {
        PriorityFilter::from(s.as_str())
    }
}

impl From<&str> for PriorityFilter {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            PriorityFilter::All
        } else {
            PriorityFilter::Only(Priority::parse(trimmed))
        }
    }
}

impl From<PriorityFilter> for String {
    fn from(filter: PriorityFilter) -> Self {
        match filter {
            PriorityFilter::All => "All".to_string(),
            PriorityFilter::Only(priority) => priority.as_str().to_string(),
        }
    }
}

/// Full report request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub report_type: ReportType,
    pub period: ReportPeriod,
    #[serde(default)]
    pub facility_filter: FacilityFilter,
    #[serde(default)]
    pub priority_filter: PriorityFilter,
}

impl ReportConfig {
    pub fn new(report_type: ReportType, period: ReportPeriod) -> Self {
        Self {
            report_type,
            period,
            facility_filter: FacilityFilter::default(),
            priority_filter: PriorityFilter::default(),
        }
    }

    pub fn with_facility_filter(mut self, filter: FacilityFilter) -> Self {
        self.facility_filter = filter;
        self
    }

    pub fn with_priority_filter(mut self, filter: PriorityFilter) -> Self {
        self.priority_filter = filter;
        self
    }

    /// Reject periods that end before they start
    pub fn validate(&self) -> Result<(), CoreError> {
        ReportPeriod::new(self.period.start, self.period.end).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_config_from_json() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "reportType": "maintenance",
                "period": {"start": "2024-01-01", "end": "2024-01-31"},
                "priorityFilter": "HIGH"
            }"#,
        )
        .unwrap();

        assert_eq!(config.report_type, ReportType::Maintenance);
        assert_eq!(config.priority_filter, PriorityFilter::Only(Priority::High));
        assert_eq!(config.facility_filter, FacilityFilter::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_priority_filter_all() {
        assert_eq!(PriorityFilter::from("All"), PriorityFilter::All);
        assert_eq!(PriorityFilter::from(""), PriorityFilter::All);
        assert!(PriorityFilter::All.matches(Priority::Unknown));
        assert!(!PriorityFilter::Only(Priority::Low).matches(Priority::High));
    }

    #[test]
    fn test_period_display_and_bounds() {
        let period = ReportPeriod::new(date("2024-01-01"), date("2024-01-31")).unwrap();
        assert_eq!(period.to_string(), "2024-01-01 to 2024-01-31");
        assert_eq!(period.days(), 31);
        assert!(period.contains(date("2024-01-31")));
        assert!(!period.contains(date("2024-02-01")));

        let previous = period.previous();
        assert_eq!(previous.start, date("2023-12-01"));
        assert_eq!(previous.end, date("2023-12-31"));
    }

    #[test]
    fn test_inverted_period_rejected() {
        assert!(ReportPeriod::new(date("2024-02-01"), date("2024-01-01")).is_err());
    }

    #[test]
    fn test_report_type_parse() {
        assert_eq!(
            "facility-usage".parse::<ReportType>().unwrap(),
            ReportType::FacilityUsage
        );
        assert!("inventory".parse::<ReportType>().is_err());
    }
}
