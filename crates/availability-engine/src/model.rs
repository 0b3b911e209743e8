//! Plain data records exchanged with the repository.
//!
//! Stored start/end times are UTC times-of-day. The `time_zone` carried by
//! each record is the zone the user entered it in, and its `date` is a
//! calendar date in that zone. The engine always renders in the query
//! timezone.

use chrono::{Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

pub type UserId = i64;
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Default IANA timezone, used when a request omits one.
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub time_zone: String,
}

/// Recurring weekly availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralAvailability {
    pub id: RecordId,
    pub user_id: UserId,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGeneralAvailability {
    pub user_id: UserId,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
}

/// Availability for one calendar date, replacing the general availability of that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAvailability {
    pub id: RecordId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomAvailability {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
}

/// A booked event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
    pub description: Option<String>,
}

/// A stored UTC time-of-day interval.
pub trait TimeRange {
    fn start_utc(&self) -> NaiveTime;
    fn end_utc(&self) -> NaiveTime;
    /// Zone the record was entered in; its `date` is a calendar date there.
    fn time_zone(&self) -> &str;
}

macro_rules! impl_time_range {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TimeRange for $ty {
                fn start_utc(&self) -> NaiveTime {
                    self.start_time
                }

                fn end_utc(&self) -> NaiveTime {
                    self.end_time
                }

                fn time_zone(&self) -> &str {
                    &self.time_zone
                }
            }
        )*
    };
}

impl_time_range!(
    GeneralAvailability,
    NewGeneralAvailability,
    CustomAvailability,
    NewCustomAvailability,
    Schedule,
    NewSchedule,
);

/// Inclusive range of calendar dates. Empty when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        let first = (self.start <= end).then_some(self.start);
        std::iter::successors(first, move |d| {
            d.checked_add_days(Days::new(1)).filter(|next| *next <= end)
        })
    }
}

/// Parse an English weekday name, ignoring case and surrounding whitespace.
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(AvailabilityError::InvalidWeekday(name.to_string())),
    }
}

/// Canonical display name of a weekday ("Monday", "Tuesday", ...).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
