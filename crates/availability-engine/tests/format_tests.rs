//! Tests for boundary formats, weekday names, and date ranges.

use availability_engine::format::{format_date, parse_date, parse_time, Slot};
use availability_engine::model::{parse_weekday, weekday_name, DateRange};
use availability_engine::AvailabilityError;
use chrono::{NaiveDate, NaiveTime, Weekday};

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Dates ───────────────────────────────────────────────────────────────────

#[test]
fn parses_day_month_year() {
    assert_eq!(parse_date("16-03-2026").unwrap(), date(2026, 3, 16));
    assert_eq!(parse_date("01-01-2027").unwrap(), date(2027, 1, 1));
}

#[test]
fn rejects_other_date_shapes() {
    let shapes = [
        "2026-03-16",
        "1-3-2026",
        "16/03/2026",
        "16-3-2026",
        "",
        "aa-bb-cccc",
        "16-03-2026 ",
    ];
    for bad in shapes {
        let err = parse_date(bad).unwrap_err();
        assert_eq!(err, AvailabilityError::InvalidDateFormat(bad.to_string()), "input {bad:?}");
    }
}

#[test]
fn rejects_impossible_calendar_dates() {
    assert!(parse_date("31-02-2026").is_err());
    assert!(parse_date("00-01-2026").is_err());
    assert!(parse_date("15-13-2026").is_err());
}

#[test]
fn formats_with_two_digit_day_and_month() {
    assert_eq!(format_date(date(2026, 3, 6)), "06-03-2026");
    assert_eq!(format_date(date(2026, 12, 25)), "25-12-2026");
}

// ── Times and slots ─────────────────────────────────────────────────────────

#[test]
fn parses_input_times() {
    assert_eq!(parse_time("09:30").unwrap(), t(9, 30));
    assert_eq!(parse_time("17:00:45").unwrap(), t(17, 0));
    assert!(matches!(parse_time("25:00"), Err(AvailabilityError::InvalidTimeFormat(_))));
    assert!(parse_time("noon").is_err());
}

#[test]
fn slot_renders_twelve_hour_clock() {
    assert_eq!(Slot::new(t(9, 0), t(17, 0)).to_string(), "09:00AM-05:00PM");
    assert_eq!(Slot::new(t(9, 0), t(11, 30)).to_string(), "09:00AM-11:30AM");
    assert_eq!(Slot::new(t(0, 0), t(12, 0)).to_string(), "12:00AM-12:00PM");
    assert_eq!(Slot::new(t(12, 15), t(23, 59)).to_string(), "12:15PM-11:59PM");
}

#[test]
fn slot_drops_seconds() {
    let with_seconds = Slot::new(
        NaiveTime::from_hms_opt(9, 0, 30).unwrap(),
        NaiveTime::from_hms_opt(10, 0, 59).unwrap(),
    );
    assert_eq!(with_seconds, Slot::new(t(9, 0), t(10, 0)));
}

#[test]
fn slots_order_chronologically() {
    let mut slots = vec![
        Slot::new(t(13, 0), t(14, 0)),
        Slot::new(t(9, 0), t(10, 0)),
        Slot::new(t(9, 0), t(9, 30)),
    ];
    slots.sort();
    let rendered: Vec<String> = slots.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["09:00AM-09:30AM", "09:00AM-10:00AM", "01:00PM-02:00PM"]);
}

// ── Weekdays ────────────────────────────────────────────────────────────────

#[test]
fn weekday_names_are_case_insensitive() {
    assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
    assert_eq!(parse_weekday("Wednesday").unwrap(), Weekday::Wed);
    assert_eq!(parse_weekday("SUNDAY").unwrap(), Weekday::Sun);
    assert_eq!(weekday_name(Weekday::Fri), "Friday");
}

#[test]
fn unknown_weekday_rejected() {
    assert_eq!(
        parse_weekday("mon").unwrap_err(),
        AvailabilityError::InvalidWeekday("mon".to_string())
    );
    assert!(parse_weekday("funday").is_err());
}

// ── Date ranges ─────────────────────────────────────────────────────────────

#[test]
fn range_iterates_inclusive_days() {
    let range = DateRange::new(date(2026, 2, 27), date(2026, 3, 2));
    let days: Vec<NaiveDate> = range.days().collect();
    assert_eq!(
        days,
        vec![date(2026, 2, 27), date(2026, 2, 28), date(2026, 3, 1), date(2026, 3, 2)]
    );
}

#[test]
fn single_day_range_yields_one_day() {
    let range = DateRange::single(date(2026, 3, 16));
    assert_eq!(range.days().count(), 1);
    assert!(range.contains(date(2026, 3, 16)));
    assert!(!range.contains(date(2026, 3, 17)));
}

#[test]
fn inverted_range_is_empty() {
    let range = DateRange::new(date(2026, 3, 17), date(2026, 3, 16));
    assert!(range.is_empty());
    assert_eq!(range.days().count(), 0);
}
