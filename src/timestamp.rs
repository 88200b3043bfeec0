//! Best-effort timestamp parsing.
//!
//! [`parse_any`] walks a fixed, ordered list of known layouts and returns
//! the first one that parses the input. There is no format detection beyond
//! that linear scan.

use chrono::format::{parse as parse_items, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// No layout in the list matched the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no matching layout for time string")]
pub struct NoMatchingLayout;

#[derive(Clone, Copy)]
enum Layout {
    /// Date only, midnight UTC.
    Date(&'static str),
    /// Date and time without zone information, taken as UTC.
    Naive(&'static str),
    /// Date and time with a numeric offset.
    Offset(&'static str),
    /// Time of day with month and day but no year; the year defaults to 0.
    Yearless(&'static str),
    /// RFC 2822, named or numeric zones.
    Rfc2822,
    /// RFC 3339, any sub-second precision, `Z` or numeric offset.
    Rfc3339,
}

// Tried in order; the first success wins. Mirrors the shape of the usual
// ISO 8601 / RFC suspects plus a couple of lenient space-separated forms
// seen in event payloads.
const LAYOUTS: &[Layout] = &[
    Layout::Date("%Y-%m-%d"),
    Layout::Naive("%Y-%m-%dT%H:%M:%SZ"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.3fZ"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%:z"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%.3f%:z"),
    Layout::Naive("%a %b %e %H:%M:%S %Y"),
    Layout::Offset("%a %b %d %H:%M:%S %z %Y"),
    Layout::Offset("%d %b %y %H:%M %z"),
    Layout::Rfc2822,
    Layout::Rfc3339,
    Layout::Yearless("%b %e %H:%M:%S"),
    Layout::Yearless("%b %e %H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%d %H:%M:%SZ"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
];

/// Attempts to parse the given string against every known layout in order,
/// returning the first success.
pub fn parse_any(text: &str) -> Result<DateTime<FixedOffset>, NoMatchingLayout> {
    for layout in LAYOUTS {
        if let Some(parsed) = try_layout(*layout, text) {
            return Ok(parsed);
        }
    }
    Err(NoMatchingLayout)
}

/// Like [`parse_any`] but collapses the not-found case into `None`.
pub fn parse_any_maybe(text: &str) -> Option<DateTime<FixedOffset>> {
    parse_any(text).ok()
}

fn try_layout(layout: Layout, text: &str) -> Option<DateTime<FixedOffset>> {
    match layout {
        Layout::Date(format) => NaiveDate::parse_from_str(text, format)
            .ok()
            .map(|date| as_utc(date.and_time(NaiveTime::MIN))),
        Layout::Naive(format) => NaiveDateTime::parse_from_str(text, format).ok().map(as_utc),
        Layout::Offset(format) => DateTime::parse_from_str(text, format).ok(),
        Layout::Yearless(format) => parse_yearless(text, format).map(as_utc),
        Layout::Rfc2822 => DateTime::parse_from_rfc2822(text).ok(),
        Layout::Rfc3339 => DateTime::parse_from_rfc3339(text).ok(),
    }
}

fn parse_yearless(text: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse_items(&mut parsed, text, StrftimeItems::new(format)).ok()?;
    parsed.set_year(0).ok()?;
    parsed.to_naive_datetime_with_offset(0).ok()
}

fn as_utc(datetime: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&datetime).into()
}
