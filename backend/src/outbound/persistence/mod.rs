//! PostgreSQL persistence adapters.

pub mod diesel_photo_repository;
pub mod diesel_profile_repository;
pub mod diesel_record_repository;
pub mod diesel_reminder_feed;
pub mod diesel_reminder_log;
pub(crate) mod models;
pub mod pool;
pub mod schema;

pub use diesel_photo_repository::DieselPhotoRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_record_repository::DieselRecordRepository;
pub use diesel_reminder_feed::DieselReminderFeed;
pub use diesel_reminder_log::DieselReminderLog;
pub use pool::{DbPool, PoolConfig, PoolError};
