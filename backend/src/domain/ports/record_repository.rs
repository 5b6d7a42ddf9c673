//! Port for vaccination record persistence.

use async_trait::async_trait;

use crate::domain::record::{NewVaccinationRecord, OwnerId, VaccinationRecord};

/// Errors raised by record repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordRepositoryError {
    /// Repository connection could not be established.
    #[error("record store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("record store query failed: {message}")]
    Query { message: String },
}

impl RecordRepositoryError {
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

/// Port for vaccination record storage.
///
/// Every operation is scoped to an owner; adapters must express the owner
/// filter themselves rather than trusting callers to pre-filter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All records belonging to an owner, ordered by next due date.
    async fn list_for_owner(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<VaccinationRecord>, RecordRepositoryError>;

    /// Insert a new record, returning it with its generated id.
    async fn insert(
        &self,
        record: &NewVaccinationRecord,
    ) -> Result<VaccinationRecord, RecordRepositoryError>;

    /// Update one edited record in place, matching on id and owner.
    ///
    /// Returns `false` when no row matched (unknown id or foreign owner);
    /// bulk edits treat that as a per-row miss, not a batch failure.
    async fn update_owned(
        &self,
        owner: &OwnerId,
        record: &VaccinationRecord,
    ) -> Result<bool, RecordRepositoryError>;
}
