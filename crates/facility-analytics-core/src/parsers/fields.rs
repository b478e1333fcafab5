//! Field accessors for loosely-typed JSON records
//!
//! The portal API is not consistent about key casing or value types: ids
//! arrive as numbers or strings, dates with or without a time part. These
//! helpers read a field under any of its aliases and coerce it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

/// Lookup result distinguishing an absent key from a present-but-null one
pub(crate) enum Field<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

/// First alias present in `obj`
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Field<'a> {
    for alias in aliases {
        match obj.get(*alias) {
            Some(Value::Null) => return Field::Null,
            Some(value) => return Field::Present(value),
            None => {}
        }
    }
    Field::Absent
}

/// Value at `outer.inner`, e.g. `facility.name`
pub(crate) fn nested<'a>(
    obj: &'a Map<String, Value>,
    outer: &str,
    inner: &str,
) -> Option<&'a Value> {
    obj.get(outer)?.as_object()?.get(inner)
}

/// Non-empty trimmed text of a scalar value
pub(crate) fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Numeric value; anything that does not parse to a finite number is 0
pub(crate) fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Identifier text: integral numbers lose their fraction (`1.0` -> `"1"`),
/// numbers that are not finite become `"0"`
///
/// Integers are rendered from their exact value, never through `f64`.
pub(crate) fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            (None, None) => format_integral(number(value)),
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(i) = trimmed.parse::<i128>() {
                return Some(i.to_string());
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_nan() => Some("0".to_string()),
                Ok(n) if n.is_finite() && n.fract() == 0.0 => Some(format_integral(n)),
                _ => Some(trimmed.to_string()),
            }
        }
        _ => None,
    }
}

fn format_integral(n: f64) -> String {
    const I64_RANGE: f64 = 9_223_372_036_854_775_808.0;
    if n.fract() != 0.0 || !n.is_finite() {
        format!("{}", n)
    } else if n.abs() < I64_RANGE {
        format!("{}", n as i64)
    } else {
        format!("{:.0}", n)
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the shapes the API emits
///
/// Offsets are dropped after conversion to UTC; bare dates mean midnight.
pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar date, accepting a full timestamp too
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    // "2024-01-01T10:00..." -> date part
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Time of day, `HH:MM` or `HH:MM:SS`
pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Combine a date field with an optional separate time field
///
/// When the date field already carries a time, the separate field is ignored.
pub(crate) fn combine_date_time(
    date: Option<&Value>,
    time: Option<&Value>,
) -> Option<NaiveDateTime> {
    let date_text = date.and_then(text)?;
    if date_text.len() > 10 {
        return parse_datetime(&date_text);
    }
    let day = parse_date(&date_text)?;
    let time = time
        .and_then(text)
        .and_then(|t| parse_time(&t))
        .unwrap_or(NaiveTime::MIN);
    Some(day.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_nan_is_zero() {
        assert_eq!(number(&json!("NaN")), 0.0);
        assert_eq!(number(&json!("abc")), 0.0);
        assert_eq!(number(&json!("12.5")), 12.5);
        assert_eq!(number(&json!(null)), 0.0);
    }

    #[test]
    fn test_identifier_normalization() {
        assert_eq!(identifier(&json!(1)), Some("1".to_string()));
        assert_eq!(identifier(&json!(1.0)), Some("1".to_string()));
        assert_eq!(identifier(&json!("1")), Some("1".to_string()));
        assert_eq!(identifier(&json!("NaN")), Some("0".to_string()));
        assert_eq!(identifier(&json!("gym-a")), Some("gym-a".to_string()));
        assert_eq!(identifier(&json!("  ")), None);
    }

    #[test]
    fn test_large_identifiers_keep_every_digit() {
        assert_eq!(
            identifier(&json!(1234567890123456789_u64)),
            Some("1234567890123456789".to_string())
        );
        assert_eq!(
            identifier(&json!(18446744073709551615_u64)),
            Some("18446744073709551615".to_string())
        );
        assert_eq!(
            identifier(&json!("1234567890123456790")),
            Some("1234567890123456790".to_string())
        );
        assert_eq!(identifier(&json!(-42)), Some("-42".to_string()));
        assert_eq!(identifier(&json!(2e19)), Some("20000000000000000000".to_string()));
        assert_eq!(identifier(&json!(1.5)), Some("1.5".to_string()));
    }

    #[test]
    fn test_parse_datetime_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-01-01T10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01 10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01T12:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_datetime("2024-01-01"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("yesterday"), None);
    }

    #[test]
    fn test_combine_date_time() {
        let combined = combine_date_time(Some(&json!("2024-03-01")), Some(&json!("09:15")));
        assert_eq!(
            combined,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 15, 0)
        );

        let midnight = combine_date_time(Some(&json!("2024-03-01")), None);
        assert_eq!(
            midnight,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );

        assert_eq!(combine_date_time(None, Some(&json!("09:15"))), None);
    }
}
