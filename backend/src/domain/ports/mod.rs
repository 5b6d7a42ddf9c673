//! Driven ports implemented by outbound adapters.
//!
//! Each port carries its own small error enum so adapters stay honest about
//! what can fail at the boundary; services map these onto the shared
//! [`crate::domain::Error`].

pub mod auth_gateway;
pub mod mailer;
pub mod photo_repository;
pub mod profile_repository;
pub mod record_repository;
pub mod reminder_feed;
pub mod reminder_log;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError, AuthenticatedUser, SignUpOutcome};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{Mailer, MailerError, OutboundEmail};
#[cfg(test)]
pub use photo_repository::MockPhotoRepository;
pub use photo_repository::{PhotoRepository, PhotoRepositoryError};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use record_repository::MockRecordRepository;
pub use record_repository::{RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use reminder_feed::MockReminderFeed;
pub use reminder_feed::{ReminderFeed, ReminderFeedError};
#[cfg(test)]
pub use reminder_log::MockReminderLog;
pub use reminder_log::{AlwaysClaimReminderLog, ReminderLog, ReminderLogError};
