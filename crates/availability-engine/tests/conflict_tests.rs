//! Tests for half-open interval overlap detection.

use availability_engine::conflict::{first_overlap, overlaps, time_ranges_overlap};
use availability_engine::model::GeneralAvailability;
use chrono::{NaiveDate, NaiveTime, Weekday};

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn monday(id: i64, start: NaiveTime, end: NaiveTime) -> GeneralAvailability {
    GeneralAvailability {
        id,
        user_id: 1,
        day: Weekday::Mon,
        start_time: start,
        end_time: end,
        time_zone: "UTC".to_string(),
    }
}

#[test]
fn identical_intervals_overlap() {
    assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
}

#[test]
fn partially_overlapping_intervals_detected() {
    // 10:00-11:00 vs 10:30-11:30
    assert!(overlaps(t(10, 0), t(11, 0), t(10, 30), t(11, 30)));
    assert!(overlaps(t(10, 30), t(11, 30), t(10, 0), t(11, 0)));
}

#[test]
fn contained_interval_overlaps() {
    assert!(overlaps(t(9, 0), t(17, 0), t(12, 0), t(13, 0)));
    assert!(overlaps(t(12, 0), t(13, 0), t(9, 0), t(17, 0)));
}

#[test]
fn adjacent_intervals_do_not_overlap() {
    // One ends exactly when the other starts.
    assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
    assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
}

#[test]
fn disjoint_intervals_do_not_overlap() {
    assert!(!overlaps(t(9, 0), t(10, 0), t(11, 0), t(12, 0)));
}

#[test]
fn zero_length_interval_overlaps_nothing() {
    assert!(!overlaps(t(10, 0), t(10, 0), t(9, 0), t(11, 0)));
    assert!(!overlaps(t(9, 0), t(11, 0), t(10, 0), t(10, 0)));
    assert!(!overlaps(5, 5, 5, 5));
}

#[test]
fn works_for_dates_and_integers() {
    let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
    assert!(overlaps(d(1), d(5), d(4), d(9)));
    assert!(!overlaps(d(1), d(5), d(5), d(9)));
    assert!(overlaps(0, 10, 9, 20));
}

#[test]
fn range_crossing_midnight_overlaps_early_morning() {
    // 21:30-00:30 UTC wraps past midnight; 00:00-01:00 falls inside its tail.
    assert!(time_ranges_overlap((t(21, 30), t(0, 30)), (t(0, 0), t(1, 0))));
    // ...and 23:30-01:30 overlaps both segments.
    assert!(time_ranges_overlap((t(21, 30), t(0, 30)), (t(23, 30), t(1, 30))));
}

#[test]
fn range_crossing_midnight_ignores_midday() {
    assert!(!time_ranges_overlap((t(21, 30), t(0, 30)), (t(9, 0), t(17, 0))));
    // Touching the wrapped end is adjacent, not overlapping.
    assert!(!time_ranges_overlap((t(21, 30), t(0, 30)), (t(0, 30), t(2, 0))));
}

#[test]
fn first_overlap_returns_first_conflicting_record() {
    let existing = vec![
        monday(1, t(8, 0), t(9, 0)),
        monday(2, t(10, 30), t(11, 30)),
        monday(3, t(10, 45), t(12, 0)),
    ];
    let candidate = monday(0, t(10, 0), t(11, 0));

    let conflict = first_overlap(&candidate, &existing).expect("should find a conflict");
    assert_eq!(conflict.id, 2);
}

#[test]
fn first_overlap_none_when_all_adjacent() {
    let existing = vec![monday(1, t(8, 0), t(10, 0)), monday(2, t(11, 0), t(12, 0))];
    let candidate = monday(0, t(10, 0), t(11, 0));

    assert!(first_overlap(&candidate, &existing).is_none());
}

#[test]
fn first_overlap_on_empty_list_is_none() {
    let candidate = monday(0, t(10, 0), t(11, 0));
    let existing: Vec<GeneralAvailability> = Vec::new();
    assert!(first_overlap(&candidate, &existing).is_none());
}
