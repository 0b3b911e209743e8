//! Detect overlapping half-open intervals.
//!
//! Two intervals `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`.
//! Adjacent intervals (one ends exactly when the other starts) do NOT overlap,
//! and an empty interval overlaps nothing.

use chrono::{NaiveTime, Timelike};

use crate::model::TimeRange;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Whether `[candidate_start, candidate_end)` overlaps `[existing_start, existing_end)`.
pub fn overlaps<T: Ord>(
    candidate_start: T,
    candidate_end: T,
    existing_start: T,
    existing_end: T,
) -> bool {
    if candidate_start >= candidate_end || existing_start >= existing_end {
        return false;
    }
    candidate_start < existing_end && existing_start < candidate_end
}

/// Overlap test for UTC time-of-day ranges.
///
/// A range whose end is earlier than its start crosses UTC midnight, and is
/// split into `[start, 24:00)` and `[00:00, end)` before comparing.
pub fn time_ranges_overlap(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> bool {
    let a = day_segments(a.0, a.1);
    let b = day_segments(b.0, b.1);

    a.iter()
        .flatten()
        .any(|&(s1, e1)| b.iter().flatten().any(|&(s2, e2)| overlaps(s1, e1, s2, e2)))
}

/// Return the first record in `existing` that overlaps `candidate`, if any.
pub fn first_overlap<'a, C, T>(candidate: &C, existing: &'a [T]) -> Option<&'a T>
where
    C: TimeRange + ?Sized,
    T: TimeRange,
{
    let span = (candidate.start_utc(), candidate.end_utc());
    existing
        .iter()
        .find(|record| time_ranges_overlap(span, (record.start_utc(), record.end_utc())))
}

/// Minute-of-day segments covered by a time-of-day range.
fn day_segments(start: NaiveTime, end: NaiveTime) -> [Option<(u32, u32)>; 2] {
    let (start, end) = (minute_of_day(start), minute_of_day(end));
    if start <= end {
        [Some((start, end)), None]
    } else {
        [Some((start, MINUTES_PER_DAY)), Some((0, end))]
    }
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}
