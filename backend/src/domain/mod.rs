//! Domain types, policies, and ports.
//!
//! Everything in here is transport and storage agnostic: the due-tier and
//! due-date policies are pure functions, the dispatcher speaks only to
//! ports, and adapters live under `inbound`/`outbound`.

pub mod due;
pub mod error;
pub mod overview;
pub mod photo;
pub mod ports;
pub mod profile;
pub mod record;
pub mod reminder;
pub mod schedule;

pub use self::due::{DueTier, classify, days_until};
pub use self::error::{Error, ErrorCode};
pub use self::overview::{PetOverview, build_overview};
pub use self::photo::{NewPetPhoto, PHOTOS_PER_PET, PetPhoto, PhotoId};
pub use self::profile::{EmailAddress, Profile, ProfileValidationError};
pub use self::record::{
    NewVaccinationRecord, OwnerId, PetName, RecordId, RecordValidationError, VaccinationRecord,
    VaccineType, WeightKg,
};
pub use self::reminder::{
    DispatchSummary, NOTIFY_DAY_OFFSETS, Reminder, ReminderDispatcher, plan_reminders,
};
pub use self::schedule::{DueDateRule, ScheduleError, VaccinationInterval};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
