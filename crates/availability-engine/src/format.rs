//! Boundary string formats: `dd-mm-yyyy` dates, `HH:MM` input times, and
//! `hh:mmAM-hh:mmPM` slots.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::{AvailabilityError, Result};

pub const DATE_FORMAT: &str = "%d-%m-%Y";
const SLOT_TIME_FORMAT: &str = "%I:%M%p";

/// Parse a `dd-mm-yyyy` date with two-digit day and month.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[2] == b'-'
        && bytes[5] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());

    if !shaped {
        return Err(AvailabilityError::InvalidDateFormat(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| AvailabilityError::InvalidDateFormat(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a 24-hour `HH:MM` (or `HH:MM:SS`) wall-clock time.
///
/// Seconds are dropped: availability is tracked at minute granularity.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| AvailabilityError::InvalidTimeFormat(input.to_string()))
}

pub(crate) fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// A local time slot as offered to users.
///
/// Slots compare by their minute-precision boundaries, so two slots are equal
/// exactly when they render to the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Slot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: truncate_to_minute(start),
            end: truncate_to_minute(end),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(SLOT_TIME_FORMAT),
            self.end.format(SLOT_TIME_FORMAT)
        )
    }
}
