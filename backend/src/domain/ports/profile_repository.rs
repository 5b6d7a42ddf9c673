//! Port for owner profile persistence.

use async_trait::async_trait;

use crate::domain::profile::Profile;
use crate::domain::record::OwnerId;

/// Errors raised by profile repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileRepositoryError {
    /// Repository connection could not be established.
    #[error("profile store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("profile store query failed: {message}")]
    Query { message: String },
}

impl ProfileRepositoryError {
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

/// Port for profile storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by owner id. `None` when the account has no row yet.
    async fn find(&self, owner: &OwnerId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Insert or replace a profile row.
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;
}
