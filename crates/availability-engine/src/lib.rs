//! # availability-engine
//!
//! Timezone-aware common availability for groups of users.
//!
//! Users register recurring weekly availability and date-specific overrides;
//! the engine renders each user's windows in a query timezone and intersects
//! them date by date to find the slots everyone shares. Storage is abstracted
//! behind [`AvailabilityRepository`] and passed explicitly into every call.
//!
//! ## Modules
//!
//! - [`tz`] — Local wall-clock time ↔ UTC time-of-day, DST-aware via `chrono-tz`
//! - [`conflict`] — Half-open interval overlap detection
//! - [`model`] — Plain data records and the inclusive [`DateRange`]
//! - [`repository`] — Storage port and the in-memory [`MemoryRepository`]
//! - [`register`] — Write-side validation: users, availability, bookings
//! - [`common`] — Common availability computation
//! - [`format`] — Boundary formats for dates and slots
//! - [`error`] — Error types

pub mod common;
pub mod conflict;
pub mod error;
pub mod format;
pub mod model;
pub mod register;
pub mod repository;
pub mod tz;

pub use common::{
    compute_common_availability, CommonAvailability, CommonAvailabilityQuery, EngineConfig,
};
pub use conflict::{first_overlap, overlaps};
pub use error::{AvailabilityError, ErrorCode, RepositoryError};
pub use format::{parse_date, Slot};
pub use model::DateRange;
pub use register::{
    create_custom_availability, create_general_availability, create_schedule, register_user,
    CustomAvailabilityRequest, GeneralAvailabilityRequest, ScheduleRequest,
};
pub use repository::{AvailabilityRepository, MemoryRepository};
pub use tz::{local_date, to_local_time_of_day, to_utc_instant, to_utc_time_of_day, today_in};
