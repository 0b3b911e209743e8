//! Conversion between local wall-clock times and UTC times-of-day.
//!
//! Only a time-of-day is stored, so every conversion needs a reference date to
//! pick the UTC offset. For general availability that date is the day the
//! record was written; the offset is then frozen into the stored time and is
//! not re-evaluated for occurrences on the other side of a DST transition.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};

/// Look up an IANA timezone by name.
///
/// # Errors
/// Returns `AvailabilityError::InvalidTimezone` for names missing from the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}

/// Convert a local time in `timezone` on `reference` to a UTC time-of-day.
///
/// Ambiguous local times (clocks falling back) resolve to the earlier instant.
/// Local times inside a spring-forward gap are moved forward by one hour, onto
/// the first wall-clock time that exists after the transition.
pub fn to_utc_time_of_day(
    local: NaiveTime,
    timezone: &str,
    reference: NaiveDate,
) -> Result<NaiveTime> {
    Ok(to_utc_instant(local, timezone, reference)?.time())
}

/// The instant a local time in `timezone` on `reference` denotes, resolved as
/// in [`to_utc_time_of_day`].
pub fn to_utc_instant(
    local: NaiveTime,
    timezone: &str,
    reference: NaiveDate,
) -> Result<DateTime<Utc>> {
    let tz = parse_timezone(timezone)?;
    let naive = reference.and_time(local);

    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    };

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AvailabilityError::NonexistentLocalTime {
            time: local,
            timezone: timezone.to_string(),
            date: reference,
        })
}

/// Convert a UTC time-of-day on `reference` to local wall-clock time in `timezone`.
pub fn to_local_time_of_day(
    utc: NaiveTime,
    timezone: &str,
    reference: NaiveDate,
) -> Result<NaiveTime> {
    let tz = parse_timezone(timezone)?;
    Ok(utc_to_local(utc, &tz, reference))
}

/// Infallible variant of [`to_local_time_of_day`] for an already-parsed zone.
pub(crate) fn utc_to_local(utc: NaiveTime, tz: &Tz, reference: NaiveDate) -> NaiveTime {
    Utc.from_utc_datetime(&reference.and_time(utc))
        .with_timezone(tz)
        .time()
}

/// The instant with UTC time-of-day `utc` that falls on local calendar date
/// `date` in `tz`.
pub(crate) fn anchor_utc(utc: NaiveTime, tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let guess = Utc.from_utc_datetime(&date.and_time(utc));
    let local_date = guess.with_timezone(tz).date_naive();
    guess + date.signed_duration_since(local_date)
}

/// Calendar date of `instant` in `timezone`.
pub fn local_date(instant: DateTime<Utc>, timezone: &str) -> Result<NaiveDate> {
    let tz = parse_timezone(timezone)?;
    Ok(instant.with_timezone(&tz).date_naive())
}

/// Today's date in `timezone`.
pub fn today_in(timezone: &str) -> Result<NaiveDate> {
    local_date(Utc::now(), timezone)
}
