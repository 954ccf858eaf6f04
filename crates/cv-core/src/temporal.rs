//! # Temporal Types: UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds.
//!
//! All calendar-date arithmetic in CareVault (daily access trends in
//! particular) uses the UTC date of a timestamp. A viewer in another
//! timezone may see an event near midnight attributed to the neighbouring
//! day; the bucketing stays deterministic regardless of where it runs.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`]: from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`]: from any RFC 3339 offset, converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SchemaValidation`] if the string is not valid
    /// RFC 3339 or carries an explicit offset (even `+00:00`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::SchemaValidation(format!(
                "Timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any timezone
    /// offset and converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            CoreError::SchemaValidation(format!("Invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The UTC calendar date of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// This timestamp moved back by `duration`.
    ///
    /// Saturates at the earliest representable instant.
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0.checked_sub_signed(duration).unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 30).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(987_000_000).unwrap());
        assert_eq!(ts.to_iso8601(), "2025-03-01T09:15:30Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2025-03-01T09:15:30Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-03-01T09:15:30Z");
    }

    #[test]
    fn test_parse_offset_rejected() {
        assert!(Timestamp::parse("2025-03-01T09:15:30+00:00").is_err());
        assert!(Timestamp::parse("2025-03-01T09:15:30-04:00").is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2025-03-01T23:30:00-05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-03-02T04:30:00Z");
    }

    #[test]
    fn test_date_is_utc_calendar_date() {
        let ts = Timestamp::parse_lenient("2025-03-01T23:30:00-05:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_minus() {
        let ts = Timestamp::parse("2025-03-10T12:00:00Z").unwrap();
        let earlier = ts.minus(Duration::days(2) + Duration::hours(3));
        assert_eq!(earlier.to_iso8601(), "2025-03-08T09:00:00Z");
        assert!(earlier < ts);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2025-03-01T09:15:30Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
