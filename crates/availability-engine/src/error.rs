//! Error types for availability-engine operations.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::model::UserId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date '{0}': expected dd-mm-yyyy")]
    InvalidDateFormat(String),

    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTimeFormat(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid time range: start {start} must be before end {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("Local time {time} does not exist in {timezone} on {date}")]
    NonexistentLocalTime {
        time: NaiveTime,
        timezone: String,
        date: NaiveDate,
    },

    /// A new availability or booking overlaps an existing record.
    #[error("Interval overlaps existing record {conflicting} for user {user_id}")]
    OverlappingInterval { user_id: UserId, conflicting: String },

    /// The store rejected a duplicate row that slipped past the overlap check.
    /// `user_id` is absent when the rejected row was the user itself.
    #[error("Duplicate record rejected by constraint {constraint}")]
    UniqueConstraintViolation {
        user_id: Option<UserId>,
        constraint: &'static str,
    },

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

/// Stable machine-readable classification of an [`AvailabilityError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    Conflict,
    NotFound,
    RepositoryUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RepositoryUnavailable => "REPOSITORY_UNAVAILABLE",
        }
    }
}

impl AvailabilityError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AvailabilityError::InvalidTimezone(_)
            | AvailabilityError::InvalidDateFormat(_)
            | AvailabilityError::InvalidTimeFormat(_)
            | AvailabilityError::InvalidWeekday(_)
            | AvailabilityError::InvalidTimeRange { .. }
            | AvailabilityError::NonexistentLocalTime { .. } => ErrorCode::InvalidInput,
            AvailabilityError::OverlappingInterval { .. }
            | AvailabilityError::UniqueConstraintViolation { .. }
            | AvailabilityError::DuplicateEmail(_) => ErrorCode::Conflict,
            AvailabilityError::UnknownUser(_) => ErrorCode::NotFound,
            AvailabilityError::RepositoryUnavailable(_) => ErrorCode::RepositoryUnavailable,
        }
    }

    /// Whether the caller caused the failure and should see the message as-is.
    pub fn is_client_error(&self) -> bool {
        self.code() != ErrorCode::RepositoryUnavailable
    }
}

/// Failures reported by an [`AvailabilityRepository`](crate::repository::AvailabilityRepository).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("unique constraint {constraint} violated")]
    UniqueViolation { constraint: &'static str },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for AvailabilityError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation { constraint } => {
                AvailabilityError::UniqueConstraintViolation {
                    user_id: None,
                    constraint,
                }
            }
            RepositoryError::Unavailable(msg) => AvailabilityError::RepositoryUnavailable(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
