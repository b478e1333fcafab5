//! Facility usage aggregation
//!
//! Groups bookings and events by facility id. Rows appear in first-seen
//! order (bookings are scanned before events) and a facility with no
//! matching record never gets a row.

use indexmap::IndexMap;

use crate::models::values::round_to;
use crate::models::{
    BookingRecord, EventRecord, FacilityFilter, FacilityRef, FacilityUsage,
    FacilityUsageAggregate,
};
use crate::parsers::filters::facility_matches;

/// Aggregate usage for the facilities passing `filter`
pub fn aggregate_facility_usage(
    bookings: &[BookingRecord],
    events: &[EventRecord],
    filter: &FacilityFilter,
) -> FacilityUsage {
    aggregate_facility_usage_by(bookings, events, |facility| {
        facility_matches(filter, facility)
    })
}

/// Aggregate usage for the facilities accepted by `include`
///
/// Unknown facility ids are aggregated under their own id with the fallback
/// name the normalizer assigned; nothing is dropped. Event hours accumulate
/// at full precision and are rounded to 2 decimals once per row.
pub fn aggregate_facility_usage_by<F>(
    bookings: &[BookingRecord],
    events: &[EventRecord],
    include: F,
) -> FacilityUsage
where
    F: Fn(&FacilityRef) -> bool,
{
    let mut usage: FacilityUsage = IndexMap::new();

    for booking in bookings.iter().filter(|b| include(&b.facility)) {
        entry(&mut usage, &booking.facility).bookings_count += 1;
    }

    for event in events.iter().filter(|e| include(&e.facility)) {
        let row = entry(&mut usage, &event.facility);
        row.events_count += 1;
        row.total_event_hours += event.duration_hours();
    }

    for row in usage.values_mut() {
        row.total_event_hours = round_to(row.total_event_hours, 2);
    }

    tracing::debug!(
        facilities = usage.len(),
        bookings = bookings.len(),
        events = events.len(),
        "Aggregated facility usage"
    );
    usage
}

fn entry<'a>(
    usage: &'a mut FacilityUsage,
    facility: &FacilityRef,
) -> &'a mut FacilityUsageAggregate {
    usage
        .entry(facility.id.clone())
        .or_insert_with(|| FacilityUsageAggregate::new(facility.id.clone(), facility.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, EventStatus, FacilityId};
    use chrono::NaiveDateTime;

    fn facility(id: &str, name: &str) -> FacilityRef {
        FacilityRef::from_id(FacilityId::new(id)).with_name(name)
    }

    fn booking(facility: FacilityRef) -> BookingRecord {
        BookingRecord {
            facility,
            status: BookingStatus::Approved,
            date: None,
        }
    }

    fn event(facility: FacilityRef, start: &str, end: &str) -> EventRecord {
        let parse = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok();
        EventRecord {
            facility,
            status: EventStatus::Approved,
            start: parse(start),
            end: parse(end),
        }
    }

    #[test]
    fn test_gym_example() {
        let gym = facility("1", "Gym");
        let bookings = vec![booking(gym.clone()), booking(gym.clone())];
        let events = vec![event(gym, "2024-01-05T10:00", "2024-01-05T13:00")];

        let usage = aggregate_facility_usage(&bookings, &events, &FacilityFilter::all());
        let row = &usage[&FacilityId::new("1")];

        assert_eq!(usage.len(), 1);
        assert_eq!(row.facility_name, "Gym");
        assert_eq!(row.bookings_count, 2);
        assert_eq!(row.events_count, 1);
        assert_eq!(row.total_event_hours, 3.0);
    }

    #[test]
    fn test_first_seen_order() {
        let bookings = vec![
            booking(facility("b", "Hall B")),
            booking(facility("a", "Hall A")),
        ];
        let events = vec![
            event(facility("c", "Hall C"), "2024-01-05T10:00", "2024-01-05T11:00"),
            event(facility("a", "Hall A"), "2024-01-05T10:00", "2024-01-05T11:00"),
        ];

        let usage = aggregate_facility_usage(&bookings, &events, &FacilityFilter::all());
        let order: Vec<_> = usage.keys().map(FacilityId::as_str).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_negative_duration_clamped() {
        let events = vec![event(
            facility("1", "Gym"),
            "2024-01-05T13:00",
            "2024-01-05T10:00",
        )];
        let usage = aggregate_facility_usage(&[], &events, &FacilityFilter::all());
        let row = &usage[&FacilityId::new("1")];
        assert_eq!(row.events_count, 1);
        assert_eq!(row.total_event_hours, 0.0);
    }

    #[test]
    fn test_filtered_out_facility_has_no_row() {
        let gym = facility("1", "Gym").with_category("Sports");
        let library = facility("2", "Library").with_category("Study");
        let bookings = vec![booking(gym), booking(library)];

        let usage = aggregate_facility_usage(
            &bookings,
            &[],
            &FacilityFilter::all().category("sports"),
        );
        assert_eq!(usage.len(), 1);
        assert!(usage.contains_key(&FacilityId::new("1")));
    }

    #[test]
    fn test_unknown_facility_kept() {
        let unknown = FacilityRef::from_id(FacilityId::unknown());
        let usage = aggregate_facility_usage(&[booking(unknown)], &[], &FacilityFilter::all());
        let row = &usage[&FacilityId::unknown()];
        assert_eq!(row.facility_name, "Facility unknown");
        assert_eq!(row.bookings_count, 1);
    }

    #[test]
    fn test_hours_rounded_to_two_decimals() {
        let gym = facility("1", "Gym");
        // 20 minutes three times = 1.0 hour, 10 minutes = 0.1666..
        let events = vec![
            event(gym.clone(), "2024-01-05T10:00", "2024-01-05T10:20"),
            event(gym.clone(), "2024-01-05T11:00", "2024-01-05T11:20"),
            event(gym.clone(), "2024-01-05T12:00", "2024-01-05T12:20"),
            event(gym, "2024-01-05T13:00", "2024-01-05T13:10"),
        ];
        let usage = aggregate_facility_usage(&[], &events, &FacilityFilter::all());
        assert_eq!(usage[&FacilityId::new("1")].total_event_hours, 1.17);
    }

    #[test]
    fn test_custom_predicate() {
        let bookings = vec![
            booking(facility("1", "Gym")),
            booking(facility("2", "Pool")),
        ];
        let usage = aggregate_facility_usage_by(&bookings, &[], |f| f.name.starts_with('P'));
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].facility_name, "Pool");
    }
}
