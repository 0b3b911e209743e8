//! Common availability across a group of users.
//!
//! For each user the engine builds a `date → slots` map over the query range:
//! custom availability on a date replaces that user's general availability for
//! the date entirely, and general availability fills every other date whose
//! weekday matches. Slots are rendered in the query timezone, then intersected
//! across users date by date.
//!
//! The intersection is exact: two slots match only when both boundaries are
//! identical after conversion. Overlapping but differently bounded windows
//! produce no common slot.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, instrument};

use crate::conflict::overlaps;
use crate::error::Result;
use crate::format::{format_date, Slot};
use crate::model::{
    CustomAvailability, DateRange, GeneralAvailability, Schedule, TimeRange, UserId,
};
use crate::repository::AvailabilityRepository;
use crate::tz::{anchor_utc, parse_timezone, utc_to_local};

/// Engine policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Drop slots that overlap one of the user's bookings in real time.
    pub exclude_booked_slots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonAvailabilityQuery {
    pub user_ids: Vec<UserId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// IANA timezone the slots are rendered in.
    pub timezone: String,
}

/// Common slots per date, both in chronological order.
///
/// Serialises as `{"dd-mm-yyyy": ["hh:mmAM-hh:mmPM", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonAvailability {
    pub dates: BTreeMap<NaiveDate, Vec<Slot>>,
}

impl CommonAvailability {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Slots on `date`, if any are common.
    pub fn slots_on(&self, date: NaiveDate) -> Option<&[Slot]> {
        self.dates.get(&date).map(Vec::as_slice)
    }

    /// The boundary representation: formatted dates and formatted slots.
    pub fn to_display(&self) -> Vec<(String, Vec<String>)> {
        self.dates
            .iter()
            .map(|(date, slots)| {
                (
                    format_date(*date),
                    slots.iter().map(Slot::to_string).collect(),
                )
            })
            .collect()
    }
}

impl Serialize for CommonAvailability {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dates.len()))?;
        for (date, slots) in &self.dates {
            let rendered: Vec<String> = slots.iter().map(Slot::to_string).collect();
            map.serialize_entry(&format_date(*date), &rendered)?;
        }
        map.end()
    }
}

type UserSlots = BTreeMap<NaiveDate, BTreeSet<Slot>>;

/// Compute the slots every user in `query.user_ids` has in common, per date.
///
/// Returns an empty result when the range is empty, when no users are given,
/// or when any user has neither general nor custom availability.
///
/// # Errors
/// `InvalidTimezone` for an unknown query timezone; `RepositoryUnavailable`
/// when the store fails.
#[instrument(
    skip(repo, query),
    fields(
        users = query.user_ids.len(),
        start = %query.start_date,
        end = %query.end_date,
        tz = %query.timezone,
    )
)]
pub fn compute_common_availability<R>(
    repo: &R,
    query: &CommonAvailabilityQuery,
    config: &EngineConfig,
) -> Result<CommonAvailability>
where
    R: AvailabilityRepository + ?Sized,
{
    let tz = parse_timezone(&query.timezone)?;
    let range = DateRange::new(query.start_date, query.end_date);

    if range.is_empty() || query.user_ids.is_empty() {
        return Ok(CommonAvailability::default());
    }

    let mut per_user: Vec<UserSlots> = Vec::with_capacity(query.user_ids.len());
    for &user_id in &query.user_ids {
        let general = repo.find_general_availability(user_id)?;
        let custom = repo.find_custom_availability(user_id, &range)?;

        if general.is_empty() && custom.is_empty() {
            debug!(user_id, "user has no availability; nothing in common");
            return Ok(CommonAvailability::default());
        }

        // Bookings entered in another zone can sit on a neighbouring date.
        let schedule = if config.exclude_booked_slots {
            let widened = DateRange::new(
                range.start.pred_opt().unwrap_or(range.start),
                range.end.succ_opt().unwrap_or(range.end),
            );
            repo.find_schedule(user_id, &widened)?
                .iter()
                .map(instants)
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let slots = user_slots(&general, &custom, &schedule, &range, &tz)?;
        debug!(user_id, dates = slots.len(), "built user slots");
        per_user.push(slots);
    }

    let mut dates: BTreeMap<NaiveDate, Vec<Slot>> = BTreeMap::new();
    for date in range.days() {
        if let Some(common) = intersect_on(&per_user, date) {
            if !common.is_empty() {
                dates.insert(date, common.into_iter().collect());
            }
        }
    }

    debug!(dates = dates.len(), "computed common availability");
    Ok(CommonAvailability { dates })
}

/// One user's slots per date within `range`.
fn user_slots(
    general: &[GeneralAvailability],
    custom: &[CustomAvailability],
    booked: &[Span],
    range: &DateRange,
    tz: &Tz,
) -> Result<UserSlots> {
    let mut slots = UserSlots::new();
    let mut overridden = HashSet::new();

    for record in custom {
        let date = record.date;
        if !range.contains(date) {
            continue;
        }
        overridden.insert(date);
        let entry = slots.entry(date).or_default();
        if !is_booked(record, date, booked)? {
            entry.insert(render(record, tz, date));
        }
    }

    for date in range.days() {
        if overridden.contains(&date) {
            continue;
        }
        for record in general.iter().filter(|r| r.day == date.weekday()) {
            if !is_booked(record, date, booked)? {
                slots.entry(date).or_default().insert(render(record, tz, date));
            }
        }
    }

    Ok(slots)
}

/// Intersection of every user's slots on `date`; `None` when a user has no entry.
fn intersect_on(per_user: &[UserSlots], date: NaiveDate) -> Option<BTreeSet<Slot>> {
    let mut users = per_user.iter();
    let mut common = users.next()?.get(&date)?.clone();
    for slots in users {
        let theirs = slots.get(&date)?;
        common.retain(|slot| theirs.contains(slot));
    }
    Some(common)
}

fn render<T: TimeRange>(record: &T, tz: &Tz, date: NaiveDate) -> Slot {
    Slot::new(
        utc_to_local(record.start_utc(), tz, date),
        utc_to_local(record.end_utc(), tz, date),
    )
}

/// A real `[start, end)` interval.
type Span = (DateTime<Utc>, DateTime<Utc>);

/// Where a record sits in real time when it occurs on `date`, a calendar date
/// in the record's own zone. Windows crossing UTC midnight end the next day.
fn span_on<T: TimeRange>(record: &T, date: NaiveDate) -> Result<Span> {
    let tz = parse_timezone(record.time_zone())?;
    let start = anchor_utc(record.start_utc(), &tz, date);
    let mut end = anchor_utc(record.end_utc(), &tz, date);
    if end <= start {
        end += Duration::days(1);
    }
    Ok((start, end))
}

fn instants(booking: &Schedule) -> Result<Span> {
    span_on(booking, booking.date)
}

fn is_booked<T: TimeRange>(record: &T, date: NaiveDate, booked: &[Span]) -> Result<bool> {
    let (start, end) = span_on(record, date)?;
    Ok(booked
        .iter()
        .any(|&(booked_start, booked_end)| overlaps(start, end, booked_start, booked_end)))
}
