//! Calendar-date validation for archive requests.
//!
//! Dates arrive as `YYYY-MM-DD` strings and are checked before any upstream
//! call is made. The archive only covers 1959 onwards.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Earliest year the historical archive has data for
pub const MIN_ARCHIVE_YEAR: u32 = 1959;

/// Separator between year, month and day
pub const DATE_SEPARATOR: char = '-';

const DATE_SEGMENTS: usize = 3;

const FEBRUARY: u32 = 2;
const FEBRUARY_DAYS: u32 = 28;
const FEBRUARY_DAYS_LEAP: u32 = 29;

const LEAP_YEAR_CYCLE: u32 = 4;
const CENTURY_CYCLE: u32 = 100;
const GREGORIAN_CYCLE: u32 = 400;

/// A date that passed [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CalendarDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub const fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

/// Why a date string was rejected. All variants are caller errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRejection {
    #[error("date must have 3 numbers separated by '{}', found {segments} part(s)", DATE_SEPARATOR)]
    MalformedStructure { segments: usize },

    #[error("{segment} in {raw} is not a number")]
    NonNumericSegment { segment: String, raw: String },

    #[error("no information about weather before year {} (requested {year})", MIN_ARCHIVE_YEAR)]
    YearOutOfRange { year: u32 },

    #[error("wrong day and month format: day {day} is not valid for month {month} of {year}")]
    InvalidDayForMonth { year: u32, month: u32, day: u32 },
}

/// Gregorian leap-year rule.
pub const fn is_leap_year(year: u32) -> bool {
    year % LEAP_YEAR_CYCLE == 0 && (year % CENTURY_CYCLE != 0 || year % GREGORIAN_CYCLE == 0)
}

/// Number of days in `month`, or `None` when the month itself is invalid.
pub const fn days_in_month(year: u32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        FEBRUARY if is_leap_year(year) => Some(FEBRUARY_DAYS_LEAP),
        FEBRUARY => Some(FEBRUARY_DAYS),
        _ => None,
    }
}

/// Check that `raw` is a real `YYYY-MM-DD` date inside archive coverage.
///
/// The string is not normalized: `2024-2-9` is accepted as written.
///
/// # Errors
/// Returns the first [`DateRejection`] hit, checking structure, then digits,
/// then the year floor, then the day against the month length.
pub fn validate(raw: &str) -> Result<CalendarDate, DateRejection> {
    let segments: Vec<&str> = raw.split(DATE_SEPARATOR).collect();
    if segments.len() != DATE_SEGMENTS {
        return Err(DateRejection::MalformedStructure {
            segments: segments.len(),
        });
    }

    let mut values = [0u32; DATE_SEGMENTS];
    for (value, segment) in values.iter_mut().zip(&segments) {
        *value = parse_digits(segment).ok_or_else(|| DateRejection::NonNumericSegment {
            segment: (*segment).to_string(),
            raw: raw.to_string(),
        })?;
    }
    let [year, month, day] = values;

    if year < MIN_ARCHIVE_YEAR {
        return Err(DateRejection::YearOutOfRange { year });
    }

    match days_in_month(year, month) {
        Some(last_day) if (1..=last_day).contains(&day) => Ok(CalendarDate { year, month, day }),
        _ => Err(DateRejection::InvalidDayForMonth { year, month, day }),
    }
}

/// Parse a run of ASCII digits, saturating instead of overflowing.
fn parse_digits(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(segment.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    }))
}
