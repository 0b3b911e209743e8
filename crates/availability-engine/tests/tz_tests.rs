//! Tests for local ↔ UTC time-of-day conversion.

use availability_engine::tz::{
    local_date, parse_timezone, to_local_time_of_day, to_utc_instant, to_utc_time_of_day,
};
use availability_engine::AvailabilityError;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn kolkata_is_five_and_a_half_hours_ahead() {
    let monday = date(2026, 3, 16);
    assert_eq!(to_utc_time_of_day(t(9, 0), "Asia/Kolkata", monday).unwrap(), t(3, 30));
    assert_eq!(to_utc_time_of_day(t(17, 0), "Asia/Kolkata", monday).unwrap(), t(11, 30));
}

#[test]
fn utc_is_identity() {
    let day = date(2026, 3, 16);
    assert_eq!(to_utc_time_of_day(t(9, 0), "UTC", day).unwrap(), t(9, 0));
    assert_eq!(to_local_time_of_day(t(17, 45), "UTC", day).unwrap(), t(17, 45));
}

#[test]
fn reference_date_selects_dst_offset() {
    // EST (-5) in January, EDT (-4) in July.
    let winter = to_utc_time_of_day(t(9, 0), "America/New_York", date(2026, 1, 15)).unwrap();
    let summer = to_utc_time_of_day(t(9, 0), "America/New_York", date(2026, 7, 15)).unwrap();
    assert_eq!(winter, t(14, 0));
    assert_eq!(summer, t(13, 0));

    let london = to_utc_time_of_day(t(12, 0), "Europe/London", date(2026, 7, 1)).unwrap();
    assert_eq!(london, t(11, 0));
}

#[test]
fn local_time_in_spring_forward_gap_shifts_forward() {
    // 2026-03-08 02:30 does not exist in New York; it becomes 03:30 EDT.
    let utc = to_utc_time_of_day(t(2, 30), "America/New_York", date(2026, 3, 8)).unwrap();
    assert_eq!(utc, t(7, 30));
}

#[test]
fn ambiguous_local_time_resolves_to_earlier_instant() {
    // 2026-11-01 01:30 happens twice in New York; the first is EDT (-4).
    let utc = to_utc_time_of_day(t(1, 30), "America/New_York", date(2026, 11, 1)).unwrap();
    assert_eq!(utc, t(5, 30));
}

#[test]
fn utc_to_local_kolkata() {
    let monday = date(2026, 3, 16);
    assert_eq!(to_local_time_of_day(t(3, 30), "Asia/Kolkata", monday).unwrap(), t(9, 0));
    // Crosses into the next local day; only the time-of-day is kept.
    assert_eq!(to_local_time_of_day(t(21, 30), "Asia/Kolkata", monday).unwrap(), t(3, 0));
}

#[test]
fn invalid_timezone_rejected() {
    let err = to_utc_time_of_day(t(9, 0), "Mars/Olympus_Mons", date(2026, 3, 16)).unwrap_err();
    assert_eq!(err, AvailabilityError::InvalidTimezone("Mars/Olympus_Mons".to_string()));

    let err = to_local_time_of_day(t(9, 0), "", date(2026, 3, 16)).unwrap_err();
    assert!(matches!(err, AvailabilityError::InvalidTimezone(_)));

    assert!(parse_timezone("Europe/Berlin").is_ok());
}

#[test]
fn local_date_depends_on_zone() {
    let evening = Utc.with_ymd_and_hms(2026, 3, 16, 20, 0, 0).unwrap();
    assert_eq!(local_date(evening, "UTC").unwrap(), date(2026, 3, 16));
    assert_eq!(local_date(evening, "Asia/Kolkata").unwrap(), date(2026, 3, 17));

    let early = Utc.with_ymd_and_hms(2026, 3, 17, 2, 0, 0).unwrap();
    assert_eq!(local_date(early, "America/Los_Angeles").unwrap(), date(2026, 3, 16));
}

#[test]
fn instant_keeps_the_utc_date() {
    // 03:00 in Kolkata is 21:30 UTC the previous day.
    let instant = to_utc_instant(t(3, 0), "Asia/Kolkata", date(2026, 3, 16)).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 15, 21, 30, 0).unwrap());
}
