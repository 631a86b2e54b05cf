//! Temporal codec
//!
//! Converts between in-memory instants/dates and the ISO-8601 string
//! forms the wire format uses. Always UTC, proleptic Gregorian, no
//! locale-dependent formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::errors::{DecodeError, DecodeResult};

/// Timestamp format with millisecond precision
const TS_FORMAT_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Timestamp format without a fractional component
const TS_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Calendar date format
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats an instant as `yyyy-MM-ddTHH:mm:ss.SSSZ`.
///
/// Always emits exactly three fraction digits; sub-millisecond
/// precision is truncated.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Formats a calendar date as `yyyy-MM-dd`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an ISO-8601 UTC timestamp.
///
/// Inputs containing a `.` are parsed with the fraction-aware format
/// (any fractional width chrono accepts), all others with the plain
/// seconds format. `parse_timestamp(format_timestamp(t)) == t` for
/// every string this codec itself produces.
pub fn parse_timestamp(input: &str) -> DecodeResult<DateTime<Utc>> {
    let format = if input.contains('.') {
        TS_FORMAT_MILLIS
    } else {
        TS_FORMAT_SECONDS
    };
    NaiveDateTime::parse_from_str(input, format)
        .map(|naive| naive.and_utc())
        .map_err(|e| DecodeError::malformed_tag("@ts", format!("{}: {}", input, e)))
}

/// Parses a `yyyy-MM-dd` calendar date.
pub fn parse_date(input: &str) -> DecodeResult<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|e| DecodeError::malformed_tag("@date", format!("{}: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_always_three_fraction_digits() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 45).unwrap();
        assert_eq!(format_timestamp(&instant), "2024-03-05T12:30:45.000Z");

        let with_millis = instant + chrono::Duration::milliseconds(42);
        assert_eq!(format_timestamp(&with_millis), "2024-03-05T12:30:45.042Z");
    }

    #[test]
    fn test_parse_epoch_without_fraction() {
        let parsed = parse_timestamp("1970-01-01T00:00:00Z").unwrap();
        assert_eq!(parsed, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_dot_selects_fraction_aware_parser() {
        let with_dot = parse_timestamp("2024-03-05T12:30:45.042Z").unwrap();
        assert_eq!(with_dot.timestamp_subsec_millis(), 42);

        let without_dot = parse_timestamp("2024-03-05T12:30:45Z").unwrap();
        assert_eq!(without_dot.timestamp_subsec_millis(), 0);
    }

    #[test]
    fn test_non_three_digit_fractions_accepted() {
        // Best-effort: any fractional width parses
        let short = parse_timestamp("2024-03-05T12:30:45.5Z").unwrap();
        assert_eq!(short.timestamp_subsec_millis(), 500);

        let long = parse_timestamp("2024-03-05T12:30:45.123456Z").unwrap();
        assert_eq!(long.timestamp_subsec_micros(), 123456);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let instant = Utc
            .with_ymd_and_hms(1999, 12, 31, 23, 59, 59)
            .unwrap()
            + chrono::Duration::milliseconds(999);
        let encoded = format_timestamp(&instant);
        assert_eq!(parse_timestamp(&encoded).unwrap(), instant);
        assert_eq!(format_timestamp(&parse_timestamp(&encoded).unwrap()), encoded);
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 3).unwrap();
        assert_eq!(format_date(&date), "1970-01-03");
        assert_eq!(parse_date("1970-01-03").unwrap(), date);
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        assert!(parse_timestamp("not a timestamp").is_err());
        assert!(parse_timestamp("2024-03-05 12:30:45Z").is_err());
        assert!(parse_date("03/05/2024").is_err());
    }
}
