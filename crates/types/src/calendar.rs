//! Time-grid utilities: calendars, spans, rounding and timestamp codecs.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::error::CoreError;
use crate::frequency::Frequency;

/// Absolute point in time, UTC, hour granularity in practice.
pub type Timestamp = NaiveDateTime;

/// Builds the calendar `start, start + f, ...` up to and including `end`.
///
/// Returns an empty calendar only when `start > end`. The calendar stops
/// early if the next entry would not be representable.
#[must_use]
pub fn make_dates(start: Timestamp, end: Timestamp, frequency: Frequency) -> Vec<Timestamp> {
    let step = frequency.as_delta();
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current
        && date <= end
    {
        dates.push(date);
        current = date.checked_add_signed(step);
    }
    dates
}

/// `ts + frequency`, or [`CoreError::OutOfRange`] past the representable range.
///
/// # Errors
/// [`CoreError::OutOfRange`] on overflow.
pub fn advance(ts: Timestamp, frequency: Frequency) -> Result<Timestamp, CoreError> {
    ts.checked_add_signed(frequency.as_delta())
        .ok_or_else(|| CoreError::OutOfRange(format!("{} + {frequency}", format_timestamp(ts))))
}

/// Returns `(earliest first date, latest last date)` over `calendars`.
///
/// # Errors
/// [`CoreError::EmptySpan`] when there are no calendars or one of them is empty.
pub fn merge_span<'a, I>(calendars: I) -> Result<(Timestamp, Timestamp), CoreError>
where
    I: IntoIterator<Item = &'a [Timestamp]>,
{
    let mut span: Option<(Timestamp, Timestamp)> = None;
    for (position, dates) in calendars.into_iter().enumerate() {
        let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
            return Err(CoreError::EmptySpan(format!(
                "calendar #{position} has no dates"
            )));
        };
        span = Some(match span {
            Some((start, end)) => (start.min(first), end.max(last)),
            None => (first, last),
        });
    }
    span.ok_or_else(|| CoreError::EmptySpan("no calendars given".to_string()))
}

/// Rounds `dt` onto the frequency grid.
///
/// Minutes, seconds and sub-seconds are dropped first. If the remaining hour
/// is off the grid, the result is the next grid boundary. The `_up` flag is
/// accepted for call-site clarity but both directions currently round up.
///
/// # Errors
/// [`CoreError::OutOfRange`] when the next boundary is not representable.
pub fn round_datetime(
    dt: Timestamp,
    frequency: Frequency,
    _up: bool,
) -> Result<Timestamp, CoreError> {
    let midnight = NaiveDateTime::new(dt.date(), NaiveTime::MIN);
    let hour = dt.hour();
    let step = frequency.hours();
    if hour % step == 0 {
        return Ok(midnight + TimeDelta::hours(i64::from(hour)));
    }
    advance(midnight + TimeDelta::hours(i64::from((hour / step) * step)), frequency)
}

/// Integer encoding `YYYYMMDDHHMMSS` used to address store windows.
#[must_use]
pub fn window_code(ts: Timestamp) -> i64 {
    i64::from(ts.year()) * 10_000_000_000
        + i64::from(ts.month()) * 100_000_000
        + i64::from(ts.day()) * 1_000_000
        + i64::from(ts.hour()) * 10_000
        + i64::from(ts.minute()) * 100
        + i64::from(ts.second())
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 date or date-time.
///
/// Offsets are converted to UTC and dropped; a bare date means midnight.
///
/// # Errors
/// [`CoreError::InvalidTimestamp`] when no supported layout matches.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, CoreError> {
    let text = text.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.naive_utc());
    }

    // "2020-01-01T06" carries no minutes, which chrono refuses.
    let padded;
    let candidate = if text.len() == 13 && matches!(text.as_bytes()[10], b'T' | b' ') {
        padded = format!("{text}:00");
        padded.as_str()
    } else {
        text
    };

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(candidate, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .map(|date| NaiveDateTime::new(date, NaiveTime::MIN))
        .map_err(|_| CoreError::InvalidTimestamp(text.to_string()))
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS`.
#[must_use]
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}
