//! Text formatting of scalar values for TCX output.
//!
//! These reproduce the exact text produced by earlier exports so downstream
//! importers see identical values: timestamps end in `.0000Z`, speeds and
//! distances always carry a fractional part, and integer rounding is half to
//! even.

use super::types::ExportError;
use chrono::{DateTime, Timelike, Utc};

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Seconds in one hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Format epoch seconds (UTC) as a TCX timestamp.
///
/// `1000` becomes `1970-01-01T00:16:40.0000Z`. Values outside chrono's range
/// are rejected.
pub fn format_timestamp(epoch_seconds: i64) -> Result<String, ExportError> {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .map(format_instant)
        .ok_or(ExportError::TimestampOutOfRange(epoch_seconds))
}

/// Format a UTC instant as a TCX timestamp.
///
/// The `+00:00` offset of an ISO-8601 rendering is folded into a literal
/// `.0000` and a `Z` is appended. Sub-second precision, when present, is
/// written as six digits ahead of that suffix.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    let mut text = instant.format("%Y-%m-%dT%H:%M:%S").to_string();
    let micros = instant.nanosecond() / 1_000;
    if micros != 0 {
        text.push_str(&format!(".{:06}", micros));
    }
    text.push_str(".0000Z");
    text
}

/// Heart rate in BPM, rounded to a whole number.
pub fn format_heart_rate(bpm: f64) -> String {
    format_whole(bpm)
}

/// Cadence in RPM, rounded to a whole number.
pub fn format_cadence(rpm: f64) -> String {
    format_whole(rpm)
}

/// Any value rounded half to even with no decimal point.
pub fn format_whole(value: f64) -> String {
    format!("{:.0}", value)
}

/// Value with exactly two decimals.
pub fn format_hundredths(value: f64) -> String {
    format!("{:.2}", value)
}

/// Convert mph to m/s rounded to two decimals.
pub fn mph_to_meters_per_second(mph: f64) -> f64 {
    let meters_per_second = mph * METERS_PER_MILE / SECONDS_PER_HOUR;
    // Round through the decimal text so ties follow the exact binary value.
    format!("{:.2}", meters_per_second)
        .parse()
        .unwrap_or(meters_per_second)
}

/// Convert mph to m/s and render it, e.g. `10.0` becomes `"4.47"`.
pub fn format_speed(mph: f64) -> String {
    format_decimal(mph_to_meters_per_second(mph))
}

/// Shortest round-trip decimal text that always has a fractional part.
///
/// `2.0` renders as `"2.0"`, `0.1 + 0.2` as `"0.30000000000000004"`.
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Distance in miles as meters with one decimal.
pub fn format_miles_as_meters(miles: f64) -> String {
    format!("{:.1}", miles * METERS_PER_MILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_shape() {
        assert_eq!(format_timestamp(1000).unwrap(), "1970-01-01T00:16:40.0000Z");
        assert_eq!(
            format_timestamp(1_600_000_000).unwrap(),
            "2020-09-13T12:26:40.0000Z"
        );
    }

    #[test]
    fn test_timestamp_out_of_range_is_rejected() {
        assert!(matches!(
            format_timestamp(i64::MAX / 2),
            Err(ExportError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn test_timestamp_with_subseconds() {
        let instant = Utc.timestamp_opt(1000, 500_000_000).unwrap();
        assert_eq!(format_instant(instant), "1970-01-01T00:16:40.500000.0000Z");
    }

    #[test]
    fn test_timestamp_order_preserving() {
        let times: Vec<String> = [0, 1, 59, 60, 3599, 3600, 86_400]
            .iter()
            .map(|offset| format_timestamp(1_600_000_000 + offset).unwrap())
            .collect();

        for pair in times.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_heart_rate_rounds_half_to_even() {
        assert_eq!(format_heart_rate(74.5), "74");
        assert_eq!(format_heart_rate(75.5), "76");
        assert_eq!(format_heart_rate(120.4), "120");
        assert_eq!(format_heart_rate(120.6), "121");
    }

    #[test]
    fn test_cadence_has_no_decimal_point() {
        assert_eq!(format_cadence(85.0), "85");
        assert_eq!(format_cadence(90.7), "91");
    }

    #[test]
    fn test_speed_conversion() {
        assert_eq!(format_speed(0.0), "0.0");
        assert_eq!(format_speed(10.0), "4.47");
        assert_eq!(format_speed(2.24), "1.0");
        assert_eq!(format_speed(4.47), "2.0");
    }

    #[test]
    fn test_decimal_never_exponential() {
        assert_eq!(format_decimal(1e16), "10000000000000000.0");
        assert_eq!(format_decimal(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_decimal(-3.0), "-3.0");
    }

    #[test]
    fn test_miles_as_meters() {
        assert_eq!(format_miles_as_meters(10.0), "16093.4");
        assert_eq!(format_miles_as_meters(0.0), "0.0");
    }

    #[test]
    fn test_hundredths() {
        assert_eq!(format_hundredths(152.0), "152.00");
        assert_eq!(format_hundredths(41.257), "41.26");
    }
}
