//! Parsers for raw portal records

pub mod collections;
mod fields;
pub mod filters;
pub mod normalizer;

pub use collections::{
    CollectionLoader, CollectionSource, NormalizedCollections, RawCollections,
};
pub use filters::{facility_matches, within_period};
pub use normalizer::{
    normalize_batch, normalize_booking, normalize_booking_lenient, normalize_event,
    normalize_event_lenient, normalize_maintenance, normalize_maintenance_lenient, Normalized,
};
