//! Port the notifier uses to load records joined with owner profiles.

use async_trait::async_trait;

use crate::domain::profile::Profile;
use crate::domain::record::VaccinationRecord;

/// Errors raised by reminder feed adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReminderFeedError {
    /// Feed connection could not be established.
    #[error("reminder feed connection failed: {message}")]
    Connection { message: String },

    /// Query failed during execution.
    #[error("reminder feed query failed: {message}")]
    Query { message: String },
}

impl ReminderFeedError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for the notifier's single read: every record with its owner profile.
///
/// Records whose owner has no profile row are omitted by adapters (the
/// dispatcher cannot address mail without one) and logged there.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderFeed: Send + Sync {
    /// All vaccination records paired with their owners' profiles.
    async fn records_with_recipients(
        &self,
    ) -> Result<Vec<(VaccinationRecord, Profile)>, ReminderFeedError>;
}
