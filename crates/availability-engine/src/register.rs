//! Write-side operations: register users, add availability, book events.
//!
//! Every availability write follows the same sequence: resolve the user and
//! timezone, validate the local range, normalise it to UTC, reject it if it
//! overlaps an existing record for the same user and day (or date), and only
//! then insert. Nothing is persisted when any step fails.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::conflict::first_overlap;
use crate::error::{AvailabilityError, RepositoryError, Result};
use crate::format::{format_date, truncate_to_minute};
use crate::model::{
    parse_weekday, weekday_name, CustomAvailability, DateRange, GeneralAvailability,
    NewCustomAvailability, NewGeneralAvailability, NewSchedule, NewUser, Schedule, TimeRange,
    User, UserId,
};
use crate::repository::{AvailabilityRepository, USER_EMAIL_CONSTRAINT};
use crate::tz::{parse_timezone, to_utc_instant};

/// Submission of recurring weekly availability, in local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralAvailabilityRequest {
    pub user_id: UserId,
    /// English weekday name, any case.
    pub day: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Falls back to the user's default timezone.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Submission of availability for one date, in local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAvailabilityRequest {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// A booking, in local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Register a new user.
///
/// # Errors
/// `InvalidTimezone` for an unknown default timezone, `DuplicateEmail` when the
/// email is taken.
#[instrument(skip(repo, user), fields(email = %user.email))]
pub fn register_user<R>(repo: &mut R, user: NewUser) -> Result<User>
where
    R: AvailabilityRepository + ?Sized,
{
    parse_timezone(&user.time_zone)?;
    let email = user.email.clone();

    match repo.insert_user(user) {
        Ok(stored) => {
            debug!(user_id = stored.id, "registered user");
            Ok(stored)
        }
        Err(RepositoryError::UniqueViolation {
            constraint: USER_EMAIL_CONSTRAINT,
        }) => {
            warn!("email already registered");
            Err(AvailabilityError::DuplicateEmail(email))
        }
        Err(err) => {
            if let RepositoryError::UniqueViolation { constraint } = &err {
                warn!(constraint, "insert rejected by uniqueness constraint");
            }
            Err(err.into())
        }
    }
}

/// Add recurring weekly availability for a user.
///
/// The local times are converted to UTC using the offset in effect on
/// `reference_date` (normally the current date).
///
/// # Errors
/// `UnknownUser`, `InvalidWeekday`, `InvalidTimezone`, `InvalidTimeRange`,
/// `OverlappingInterval` when the window overlaps an existing one on the same
/// weekday, `UniqueConstraintViolation` when the store rejects a duplicate.
#[instrument(skip(repo, request), fields(user_id = request.user_id, day = %request.day))]
pub fn create_general_availability<R>(
    repo: &mut R,
    request: &GeneralAvailabilityRequest,
    reference_date: NaiveDate,
) -> Result<GeneralAvailability>
where
    R: AvailabilityRepository + ?Sized,
{
    let time_zone = resolve_time_zone(&*repo, request.user_id, request.time_zone.as_deref())?;
    let day = parse_weekday(&request.day)?;
    let (start_time, end_time) = normalize_window(
        request.start_time,
        request.end_time,
        &time_zone,
        reference_date,
    )?;

    let candidate = NewGeneralAvailability {
        user_id: request.user_id,
        day,
        start_time,
        end_time,
        time_zone,
    };

    let existing: Vec<GeneralAvailability> = repo
        .find_general_availability(request.user_id)?
        .into_iter()
        .filter(|r| r.day == day)
        .collect();

    if let Some(conflict) = first_overlap(&candidate, &existing) {
        let conflicting = format!(
            "{} {} (id {})",
            weekday_name(conflict.day),
            describe(conflict),
            conflict.id
        );
        warn!(%conflicting, "rejected overlapping general availability");
        return Err(AvailabilityError::OverlappingInterval {
            user_id: request.user_id,
            conflicting,
        });
    }

    let stored = repo
        .insert_general_availability(candidate)
        .map_err(|err| insert_error(err, request.user_id))?;
    debug!(id = stored.id, "stored general availability");
    Ok(stored)
}

/// Add availability for a single date. The date itself fixes the UTC offset.
///
/// # Errors
/// As [`create_general_availability`], with overlap checked against the
/// user's other custom availability on the same date.
#[instrument(skip(repo, request), fields(user_id = request.user_id, date = %request.date))]
pub fn create_custom_availability<R>(
    repo: &mut R,
    request: &CustomAvailabilityRequest,
) -> Result<CustomAvailability>
where
    R: AvailabilityRepository + ?Sized,
{
    let time_zone = resolve_time_zone(&*repo, request.user_id, request.time_zone.as_deref())?;
    let (start_time, end_time) =
        normalize_window(request.start_time, request.end_time, &time_zone, request.date)?;

    let candidate = NewCustomAvailability {
        user_id: request.user_id,
        date: request.date,
        start_time,
        end_time,
        time_zone,
    };

    let existing =
        repo.find_custom_availability(request.user_id, &DateRange::single(request.date))?;

    if let Some(conflict) = first_overlap(&candidate, &existing) {
        let conflicting = format!(
            "{} {} (id {})",
            format_date(conflict.date),
            describe(conflict),
            conflict.id
        );
        warn!(%conflicting, "rejected overlapping custom availability");
        return Err(AvailabilityError::OverlappingInterval {
            user_id: request.user_id,
            conflicting,
        });
    }

    let stored = repo
        .insert_custom_availability(candidate)
        .map_err(|err| insert_error(err, request.user_id))?;
    debug!(id = stored.id, "stored custom availability");
    Ok(stored)
}

/// Book an event. Bookings for the same user and date may not overlap.
#[instrument(skip(repo, request), fields(user_id = request.user_id, date = %request.date))]
pub fn create_schedule<R>(repo: &mut R, request: &ScheduleRequest) -> Result<Schedule>
where
    R: AvailabilityRepository + ?Sized,
{
    let time_zone = resolve_time_zone(&*repo, request.user_id, request.time_zone.as_deref())?;
    let (start_time, end_time) =
        normalize_window(request.start_time, request.end_time, &time_zone, request.date)?;

    let candidate = NewSchedule {
        user_id: request.user_id,
        date: request.date,
        start_time,
        end_time,
        time_zone,
        description: request.description.clone(),
    };

    let existing = repo.find_schedule(request.user_id, &DateRange::single(request.date))?;

    if let Some(conflict) = first_overlap(&candidate, &existing) {
        let conflicting = format!(
            "{} {} (id {})",
            format_date(conflict.date),
            describe(conflict),
            conflict.id
        );
        warn!(%conflicting, "rejected overlapping booking");
        return Err(AvailabilityError::OverlappingInterval {
            user_id: request.user_id,
            conflicting,
        });
    }

    let stored = repo
        .insert_schedule(candidate)
        .map_err(|err| insert_error(err, request.user_id))?;
    debug!(id = stored.id, "stored booking");
    Ok(stored)
}

/// The timezone a write should use: the request's, else the user's default.
fn resolve_time_zone<R>(repo: &R, user_id: UserId, requested: Option<&str>) -> Result<String>
where
    R: AvailabilityRepository + ?Sized,
{
    let user = repo
        .find_user(user_id)?
        .ok_or(AvailabilityError::UnknownUser(user_id))?;

    let time_zone = requested.map_or(user.time_zone, str::to_string);
    parse_timezone(&time_zone)?;
    Ok(time_zone)
}

/// Validate a local `[start, end)` window and convert both ends to UTC.
///
/// The ends are compared again once resolved to instants: a start inside a
/// spring-forward gap moves forward and may land on or after the end.
fn normalize_window(
    start: NaiveTime,
    end: NaiveTime,
    time_zone: &str,
    reference: NaiveDate,
) -> Result<(NaiveTime, NaiveTime)> {
    let (start, end) = (truncate_to_minute(start), truncate_to_minute(end));
    if start >= end {
        return Err(AvailabilityError::InvalidTimeRange { start, end });
    }

    let start_at = to_utc_instant(start, time_zone, reference)?;
    let end_at = to_utc_instant(end, time_zone, reference)?;
    if end_at <= start_at {
        warn!(%start, %end, time_zone, "window collapses across a DST gap");
        return Err(AvailabilityError::NonexistentLocalTime {
            time: start,
            timezone: time_zone.to_string(),
            date: reference,
        });
    }
    Ok((start_at.time(), end_at.time()))
}

fn describe<T: TimeRange>(record: &T) -> String {
    format!(
        "{}-{} UTC",
        record.start_utc().format("%H:%M"),
        record.end_utc().format("%H:%M")
    )
}

/// Translate a failed insert. A uniqueness violation means a concurrent write
/// won the race past the overlap check.
fn insert_error(err: RepositoryError, user_id: UserId) -> AvailabilityError {
    match err {
        RepositoryError::UniqueViolation { constraint } => {
            warn!(user_id, constraint, "insert rejected by uniqueness constraint");
            AvailabilityError::UniqueConstraintViolation {
                user_id: Some(user_id),
                constraint,
            }
        }
        RepositoryError::Unavailable(msg) => AvailabilityError::RepositoryUnavailable(msg),
    }
}
