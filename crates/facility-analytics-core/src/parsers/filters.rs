//! Record inclusion filters
//!
//! Report pages let the user narrow a usage report to one facility category
//! or one specific facility, and a maintenance report to one priority. The
//! predicates here turn those selections into record-level checks.

use chrono::NaiveDate;

use crate::models::{FacilityFilter, FacilityRef, ReportPeriod};

/// "No constraint" selections: missing, blank, or "all" in any case
fn is_unconstrained(selection: Option<&str>) -> bool {
    match selection.map(str::trim) {
        None => true,
        Some(s) => s.is_empty() || s.eq_ignore_ascii_case("all"),
    }
}

/// Check whether a facility passes the category / specific-facility filter
///
/// Categories compare case-insensitively; a facility with no category never
/// matches a category constraint. Facility ids compare exactly.
///
/// # Examples
///
/// ```
/// use facility_analytics_core::models::{FacilityFilter, FacilityId, FacilityRef};
/// use facility_analytics_core::parsers::filters::facility_matches;
///
/// let gym = FacilityRef::from_id(FacilityId::new("1")).with_category("Sports");
/// assert!(facility_matches(&FacilityFilter::all(), &gym));
/// assert!(facility_matches(&FacilityFilter::all().category("sports"), &gym));
/// assert!(!facility_matches(&FacilityFilter::all().category("Arts"), &gym));
/// ```
pub fn facility_matches(filter: &FacilityFilter, facility: &FacilityRef) -> bool {
    if !is_unconstrained(filter.category.as_deref()) {
        let wanted = filter.category.as_deref().unwrap_or_default().trim();
        match &facility.category {
            Some(category) if category.trim().eq_ignore_ascii_case(wanted) => {}
            _ => return false,
        }
    }

    if !is_unconstrained(filter.specific_facility.as_deref()) {
        let wanted = filter.specific_facility.as_deref().unwrap_or_default().trim();
        if facility.id.as_str() != wanted {
            return false;
        }
    }

    true
}

/// Check whether a record date falls inside the reporting period
///
/// Records without a usable date are kept: dropping them would make them
/// vanish from the counts.
pub fn within_period(period: &ReportPeriod, date: Option<NaiveDate>) -> bool {
    date.map_or(true, |d| period.contains(d))
}
