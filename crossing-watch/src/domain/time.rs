//! Timestamps for crossing state changes.
//!
//! The state feed reports the moment a crossing last changed as Unix epoch
//! seconds. This module converts those into UTC timestamps and produces the
//! two human-readable strings shown next to each crossing: the absolute
//! "since" time and the relative duration.

use chrono::{DateTime, FixedOffset, Utc};

/// Error returned when an epoch timestamp cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Convert epoch seconds (possibly fractional) into a UTC timestamp.
///
/// # Examples
///
/// ```
/// use crossing_watch::domain::timestamp_from_epoch;
///
/// let t = timestamp_from_epoch(1_700_000_000.5).unwrap();
/// assert_eq!(t.timestamp(), 1_700_000_000);
/// assert_eq!(t.timestamp_subsec_millis(), 500);
///
/// assert!(timestamp_from_epoch(f64::NAN).is_err());
/// ```
pub fn timestamp_from_epoch(secs: f64) -> Result<DateTime<Utc>, TimeError> {
    if !secs.is_finite() {
        return Err(TimeError::new("epoch seconds must be finite"));
    }

    let whole = secs.floor();
    // Outside this range the i64 cast saturates; chrono rejects it anyway.
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return Err(TimeError::new("epoch seconds out of range"));
    }

    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    let nanos = nanos.min(999_999_999);

    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| TimeError::new("epoch seconds out of range"))
}

/// Format the absolute time of a state change, e.g. `"Mar 15, 2024 2:30 PM"`.
pub fn format_start(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%b %-d, %Y %-I:%M %p")
        .to_string()
}

/// Format the time elapsed between `since` and `now` in words.
///
/// Buckets follow the usual "time ago" phrasing: minutes up to 45, then
/// rounded hours, then days. A `since` in the future (clock skew between
/// the feed and us) reads as just having happened.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use crossing_watch::domain::format_elapsed;
///
/// let now = Utc::now();
/// assert_eq!(format_elapsed(now - Duration::minutes(12), now), "12 minutes");
/// assert_eq!(format_elapsed(now - Duration::hours(3), now), "about 3 hours");
/// ```
pub fn format_elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(since).num_seconds().max(0);
    let mins = (secs + 30) / 60;

    match mins {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..45 => format!("{mins} minutes"),
        45..90 => "about 1 hour".to_string(),
        90..1440 => format!("about {} hours", (mins + 30) / 60),
        1440..2520 => "1 day".to_string(),
        _ => format!("{} days", (mins + 720) / 1440),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
    }

    #[test]
    fn epoch_integer_seconds() {
        let t = timestamp_from_epoch(0.0).unwrap();
        assert_eq!(t, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn epoch_rejects_non_finite() {
        assert!(timestamp_from_epoch(f64::INFINITY).is_err());
        assert!(timestamp_from_epoch(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn epoch_rejects_out_of_range() {
        assert!(timestamp_from_epoch(1e300).is_err());
    }

    #[test]
    fn start_in_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_start(now(), utc), "Mar 15, 2024 2:30 PM");
    }

    #[test]
    fn start_in_offset() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_start(now(), eastern), "Mar 15, 2024 9:30 AM");
    }

    #[test]
    fn elapsed_buckets() {
        let n = now();
        assert_eq!(format_elapsed(n, n), "less than a minute");
        assert_eq!(format_elapsed(n - Duration::seconds(20), n), "less than a minute");
        assert_eq!(format_elapsed(n - Duration::seconds(60), n), "1 minute");
        assert_eq!(format_elapsed(n - Duration::minutes(44), n), "44 minutes");
        assert_eq!(format_elapsed(n - Duration::minutes(45), n), "about 1 hour");
        assert_eq!(format_elapsed(n - Duration::minutes(100), n), "about 2 hours");
        assert_eq!(format_elapsed(n - Duration::hours(23), n), "about 23 hours");
        assert_eq!(format_elapsed(n - Duration::hours(30), n), "1 day");
        assert_eq!(format_elapsed(n - Duration::days(5), n), "5 days");
    }

    #[test]
    fn elapsed_future_is_clamped() {
        let n = now();
        assert_eq!(format_elapsed(n + Duration::minutes(5), n), "less than a minute");
    }
}
