//! Calendar date normalization for raw date cells.
//!
//! # Responsibility
//! - Turn textual and spreadsheet-serial dates into `NaiveDate`.
//! - Discard any time-of-day component.
//!
//! # Invariants
//! - The wall-clock date is kept when an offset is present; no timezone
//!   conversion is applied.
//! - Numeric `a/b/yyyy` text is read month first.
//! - Normalization is pure and never consults the clock or environment.

use crate::model::record::RawDate;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest serial accepted, 9999-12-31.
const MAX_SERIAL_DAY: f64 = 2_958_465.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

static YEAR_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<y>\d{4})(?P<s1>[-/.])(?P<m>\d{1,2})(?P<s2>[-/.])(?P<d>\d{1,2})(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:[.,]\d+)?)?(?:\s*[AaPp][Mm])?\s*(?:Z|[+-]\d{2}(?::?\d{2})?)?)?$",
    )
    .expect("valid year-first date regex")
});
static MONTH_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})(?:\s+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AaPp][Mm])?)?$",
    )
    .expect("valid month-first date regex")
});
static COMPACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})$").expect("valid compact date regex")
});

const MONTH_NAME_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Reason a raw date cell could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// The cell is empty.
    Missing,
    /// Text does not match any supported date shape.
    UnrecognizedFormat(String),
    /// Shape matched but the calendar values do not exist, e.g. `2024-02-30`.
    InvalidCalendarDate(String),
    /// Serial number is negative, non-finite or past 9999-12-31.
    SerialOutOfRange(String),
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "date cell is empty"),
            Self::UnrecognizedFormat(value) => write!(f, "unrecognized date format `{value}`"),
            Self::InvalidCalendarDate(value) => write!(f, "`{value}` is not a calendar date"),
            Self::SerialOutOfRange(value) => {
                write!(f, "spreadsheet serial date `{value}` is out of range")
            }
        }
    }
}

impl Error for DateParseError {}

/// Normalizes one raw date cell into a calendar date.
pub fn normalize_date(raw: &RawDate) -> Result<NaiveDate, DateParseError> {
    match raw {
        RawDate::Text(text) => parse_date_text(text),
        RawDate::Serial(serial) => serial_to_datetime(*serial)
            .map(|value| value.date())
            .ok_or_else(|| DateParseError::SerialOutOfRange(serial.to_string())),
        RawDate::Missing => Err(DateParseError::Missing),
    }
}

/// Parses date text, discarding any time-of-day suffix.
///
/// Accepted shapes: `YYYY-MM-DD` (also `/` or `.` separators) with an optional
/// time, `AM`/`PM` marker and offset, `MM/DD/YYYY` with an optional time,
/// compact `YYYYMMDD`, month-name forms such as `January 2, 2024`,
/// `Jan 2 2024`, `02-Jan-2024` or `Tuesday, January 2, 2024`, and RFC 2822.
pub fn parse_date_text(text: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Missing);
    }

    if let Some(caps) = YEAR_FIRST_RE.captures(trimmed) {
        if caps["s1"] != caps["s2"] {
            return Err(DateParseError::UnrecognizedFormat(trimmed.to_string()));
        }
        return calendar_date(trimmed, &caps["y"], &caps["m"], &caps["d"]);
    }

    if let Some(caps) = MONTH_FIRST_RE.captures(trimmed) {
        return calendar_date(trimmed, &caps["y"], &caps["m"], &caps["d"]);
    }

    if let Some(caps) = COMPACT_RE.captures(trimmed) {
        return calendar_date(trimmed, &caps["y"], &caps["m"], &caps["d"]);
    }

    for format in MONTH_NAME_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    if let Ok(value) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(value.naive_local().date());
    }

    Err(DateParseError::UnrecognizedFormat(trimmed.to_string()))
}

/// Converts a spreadsheet serial day number into a date-time.
///
/// Returns `None` for negative, non-finite or out-of-range serials.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= MAX_SERIAL_DAY + 1.0 {
        return None;
    }

    let days = serial.floor();
    let seconds = ((serial - days) * SECONDS_PER_DAY).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

fn calendar_date(source: &str, year: &str, month: &str, day: &str) -> Result<NaiveDate, DateParseError> {
    let invalid = || DateParseError::InvalidCalendarDate(source.to_string());
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let day = day.parse::<u32>().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
