//! Single-day time window and departure timestamp parsing.
//!
//! The departure board speaks local wall-clock time without an offset
//! ("2022-07-01T08:15"), so everything here works on `NaiveDateTime`.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Format used when sending a cursor timestamp to the API.
const QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Offset of 23:59:59 from midnight.
const LAST_SECOND_OF_DAY: i64 = 24 * 60 * 60 - 1;

/// Accepted formats for a departure's `dateTime` field, tried in order.
const RECORD_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Hour-only forms. chrono needs a minute, so `:00` is appended before parsing.
const HOUR_FORMATS: &[&str] = &["%Y-%m-%dT%H", "%Y-%m-%d %H"];

/// Error returned when a departure timestamp cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {value:?}: expected YYYY-MM-DDTHH[:MM[:SS]]")]
pub struct TimestampError {
    value: String,
}

/// The fixed `(start, end)` range within which departures are accepted.
///
/// Both bounds are exclusive: a departure at exactly `start` or exactly
/// `end` lies outside the window.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fahrplan_extract::domain::TimeWindow;
///
/// let day = NaiveDate::from_ymd_opt(2022, 7, 1).unwrap();
/// let window = TimeWindow::for_day(day);
///
/// let noon = day.and_hms_opt(12, 0, 0).unwrap();
/// assert!(window.contains(noon));
/// assert!(!window.contains(window.start()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// The window covering one calendar day: `00:00:00` to `23:59:59`.
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::seconds(LAST_SECOND_OF_DAY),
        }
    }

    /// Lower bound (exclusive). Also the first cursor of every station crawl.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Upper bound (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whether `t` lies strictly inside the window.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start < t && t < self.end
    }
}

/// Parse a departure's `dateTime` field.
///
/// Date and time are separated by `T` or a space; minutes and seconds are
/// optional. Offsets are rejected: the window has no zone, so an
/// offset-carrying timestamp cannot be compared against it.
pub fn parse_departure_time(value: &str) -> Result<NaiveDateTime, TimestampError> {
    RECORD_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            let padded = format!("{value}:00");
            HOUR_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(&padded, &format!("{fmt}:%M")).ok()
            })
        })
        .ok_or_else(|| TimestampError {
            value: value.to_string(),
        })
}

/// Render a cursor timestamp for the `date` query parameter.
pub fn format_query_time(t: NaiveDateTime) -> String {
    t.format(QUERY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 7, 1).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn day_window_bounds() {
        let window = TimeWindow::for_day(day());
        assert_eq!(window.start(), at(0, 0, 0));
        assert_eq!(window.end(), at(23, 59, 59));
    }

    #[test]
    fn bounds_are_exclusive() {
        let window = TimeWindow::for_day(day());
        assert!(!window.contains(at(0, 0, 0)));
        assert!(window.contains(at(0, 0, 1)));
        assert!(window.contains(at(23, 59, 58)));
        assert!(!window.contains(at(23, 59, 59)));
    }

    #[test]
    fn next_day_is_outside() {
        let window = TimeWindow::for_day(day());
        let next = NaiveDate::from_ymd_opt(2022, 7, 2)
            .unwrap()
            .and_hms_opt(0, 5, 0)
            .unwrap();
        assert!(!window.contains(next));
    }

    #[test]
    fn parse_with_and_without_seconds() {
        assert_eq!(parse_departure_time("2022-07-01T08:15").unwrap(), at(8, 15, 0));
        assert_eq!(
            parse_departure_time("2022-07-01T08:15:30").unwrap(),
            at(8, 15, 30)
        );
    }

    #[test]
    fn parse_space_separator_and_hour_only() {
        assert_eq!(parse_departure_time("2022-07-01 08:15").unwrap(), at(8, 15, 0));
        assert_eq!(
            parse_departure_time("2022-07-01 08:15:30.5").unwrap(),
            at(8, 15, 30) + Duration::milliseconds(500)
        );
        assert_eq!(parse_departure_time("2022-07-01T08").unwrap(), at(8, 0, 0));
        assert_eq!(parse_departure_time("2022-07-01 23").unwrap(), at(23, 0, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_departure_time("").is_err());
        assert!(parse_departure_time("08:15").is_err());
        assert!(parse_departure_time("2022-07-01").is_err());
        assert!(parse_departure_time("2022-07-01T08:15+02:00").is_err());
        assert!(parse_departure_time("2022-13-01T08:15").is_err());
        assert!(parse_departure_time("2022-07-01T25").is_err());
        assert!(parse_departure_time("2022-07-01T08:").is_err());
    }

    #[test]
    fn query_format_has_seconds() {
        assert_eq!(format_query_time(at(0, 0, 0)), "2022-07-01T00:00:00");
        assert_eq!(format_query_time(at(17, 42, 0)), "2022-07-01T17:42:00");
    }

    #[test]
    fn error_display() {
        let err = parse_departure_time("soon").unwrap_err();
        assert!(err.to_string().contains("\"soon\""));
    }
}
