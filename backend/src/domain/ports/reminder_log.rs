//! Port for the reminder dedup log.
//!
//! The original notifier kept no sent-state and double-sent when run twice
//! on one day. Dispatch claims a (record, due date, day offset) key before
//! sending so reruns are idempotent.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::record::RecordId;

/// Errors raised by reminder log adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReminderLogError {
    /// Log connection could not be established.
    #[error("reminder log connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("reminder log query failed: {message}")]
    Query { message: String },
}

impl ReminderLogError {
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

/// Port recording which reminders have already been dispatched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderLog: Send + Sync {
    /// Atomically claim the (record, due date, offset) key.
    ///
    /// Returns `true` when this call made the claim and mail should be
    /// sent; `false` when a previous run already holds it.
    async fn try_claim(
        &self,
        record: RecordId,
        due_date: NaiveDate,
        day_offset: i64,
    ) -> Result<bool, ReminderLogError>;
}

/// Log that never suppresses anything; used for dry runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysClaimReminderLog;

#[async_trait]
impl ReminderLog for AlwaysClaimReminderLog {
    async fn try_claim(
        &self,
        _record: RecordId,
        _due_date: NaiveDate,
        _day_offset: i64,
    ) -> Result<bool, ReminderLogError> {
        Ok(true)
    }
}
