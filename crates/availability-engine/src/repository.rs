//! Storage port used by the engine and the write-side operations.
//!
//! Reads take `&self`; inserts take `&mut self`, so a check-then-insert
//! sequence holds exclusive access to the store for its whole duration.
//! Implementations must still enforce the uniqueness constraints below and
//! report violations as [`RepositoryError::UniqueViolation`].

use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::model::{
    CustomAvailability, DateRange, GeneralAvailability, NewCustomAvailability,
    NewGeneralAvailability, NewSchedule, NewUser, RecordId, Schedule, User, UserId,
};

pub const USER_EMAIL_CONSTRAINT: &str = "unique_user_email";
pub const GENERAL_AVAILABILITY_CONSTRAINT: &str = "unique_general_availability";
pub const CUSTOM_AVAILABILITY_CONSTRAINT: &str = "unique_custom_availability";
pub const SCHEDULE_CONSTRAINT: &str = "unique_schedule";

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

pub trait AvailabilityRepository {
    fn find_user(&self, user_id: UserId) -> RepoResult<Option<User>>;

    /// Fails with `UniqueViolation` when the email is already registered.
    fn insert_user(&mut self, user: NewUser) -> RepoResult<User>;

    /// All recurring availability of a user, regardless of date.
    fn find_general_availability(&self, user_id: UserId) -> RepoResult<Vec<GeneralAvailability>>;

    fn find_custom_availability(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> RepoResult<Vec<CustomAvailability>>;

    fn find_schedule(&self, user_id: UserId, range: &DateRange) -> RepoResult<Vec<Schedule>>;

    /// Unique on (user, day, start, end).
    fn insert_general_availability(
        &mut self,
        record: NewGeneralAvailability,
    ) -> RepoResult<GeneralAvailability>;

    /// Unique on (user, date, start, end).
    fn insert_custom_availability(
        &mut self,
        record: NewCustomAvailability,
    ) -> RepoResult<CustomAvailability>;

    /// Unique on (user, date, start, end).
    fn insert_schedule(&mut self, record: NewSchedule) -> RepoResult<Schedule>;
}

/// In-memory store. Serialises to a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRepository {
    #[serde(default)]
    next_id: RecordId,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    general_availability: Vec<GeneralAvailability>,
    #[serde(default)]
    custom_availability: Vec<CustomAvailability>,
    #[serde(default)]
    schedules: Vec<Schedule>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

impl AvailabilityRepository for MemoryRepository {
    fn find_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn insert_user(&mut self, user: NewUser) -> RepoResult<User> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation {
                constraint: USER_EMAIL_CONSTRAINT,
            });
        }
        let stored = User {
            id: self.allocate_id(),
            name: user.name,
            email: user.email,
            time_zone: user.time_zone,
        };
        self.users.push(stored.clone());
        Ok(stored)
    }

    fn find_general_availability(&self, user_id: UserId) -> RepoResult<Vec<GeneralAvailability>> {
        Ok(self
            .general_availability
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_custom_availability(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> RepoResult<Vec<CustomAvailability>> {
        Ok(self
            .custom_availability
            .iter()
            .filter(|r| r.user_id == user_id && range.contains(r.date))
            .cloned()
            .collect())
    }

    fn find_schedule(&self, user_id: UserId, range: &DateRange) -> RepoResult<Vec<Schedule>> {
        Ok(self
            .schedules
            .iter()
            .filter(|r| r.user_id == user_id && range.contains(r.date))
            .cloned()
            .collect())
    }

    fn insert_general_availability(
        &mut self,
        record: NewGeneralAvailability,
    ) -> RepoResult<GeneralAvailability> {
        let duplicate = self.general_availability.iter().any(|r| {
            r.user_id == record.user_id
                && r.day == record.day
                && r.start_time == record.start_time
                && r.end_time == record.end_time
        });
        if duplicate {
            return Err(RepositoryError::UniqueViolation {
                constraint: GENERAL_AVAILABILITY_CONSTRAINT,
            });
        }
        let stored = GeneralAvailability {
            id: self.allocate_id(),
            user_id: record.user_id,
            day: record.day,
            start_time: record.start_time,
            end_time: record.end_time,
            time_zone: record.time_zone,
        };
        self.general_availability.push(stored.clone());
        Ok(stored)
    }

    fn insert_custom_availability(
        &mut self,
        record: NewCustomAvailability,
    ) -> RepoResult<CustomAvailability> {
        let duplicate = self.custom_availability.iter().any(|r| {
            r.user_id == record.user_id
                && r.date == record.date
                && r.start_time == record.start_time
                && r.end_time == record.end_time
        });
        if duplicate {
            return Err(RepositoryError::UniqueViolation {
                constraint: CUSTOM_AVAILABILITY_CONSTRAINT,
            });
        }
        let stored = CustomAvailability {
            id: self.allocate_id(),
            user_id: record.user_id,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            time_zone: record.time_zone,
        };
        self.custom_availability.push(stored.clone());
        Ok(stored)
    }

    fn insert_schedule(&mut self, record: NewSchedule) -> RepoResult<Schedule> {
        let duplicate = self.schedules.iter().any(|r| {
            r.user_id == record.user_id
                && r.date == record.date
                && r.start_time == record.start_time
                && r.end_time == record.end_time
        });
        if duplicate {
            return Err(RepositoryError::UniqueViolation {
                constraint: SCHEDULE_CONSTRAINT,
            });
        }
        let stored = Schedule {
            id: self.allocate_id(),
            user_id: record.user_id,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            time_zone: record.time_zone,
            description: record.description,
        };
        self.schedules.push(stored.clone());
        Ok(stored)
    }
}
