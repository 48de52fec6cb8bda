//! Fixed-format timestamp encoding used for every persisted date.
//!
//! Dates are stored as text in UTC with a numeric zero offset, for example
//! `2018-03-04T12:30:00+0000`. Sub-second precision is not persisted.

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// `strftime` pattern for stored dates.
pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// The current time, truncated to whole seconds so that a value read back
/// from storage compares equal to the one that was written.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(0)
}

/// Render a timestamp in the storage format.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Parse a stored date. Any offset is accepted and normalised to UTC.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, CoreError> {
    DateTime::parse_from_str(value, STORAGE_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_with_zero_offset() {
        let ts = Utc.with_ymd_and_hms(2018, 3, 4, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2018-03-04T12:30:00+0000");
    }

    #[test]
    fn parses_stored_format() {
        let ts = parse_timestamp("2018-03-04T12:30:00+0000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2018, 3, 4, 12, 30, 0).unwrap());
    }

    #[test]
    fn parse_normalises_non_zero_offset() {
        let ts = parse_timestamp("2018-03-04T14:30:00+0200").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2018, 3, 4, 12, 30, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_matches!(
            parse_timestamp("yesterday"),
            Err(CoreError::InvalidTimestamp { value, .. }) if value == "yesterday"
        );
    }

    #[test]
    fn parse_rejects_missing_offset() {
        assert!(parse_timestamp("2018-03-04T12:30:00").is_err());
    }

    #[test]
    fn now_round_trips_exactly() {
        let ts = now();
        assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
    }
}
