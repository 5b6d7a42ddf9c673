//! PostgreSQL-backed [`ReminderLog`] implementation using Diesel.
//!
//! The ledger's unique index over (record, due date, offset) is what makes
//! `try_claim` atomic: concurrent runs race on the insert and exactly one
//! of them observes an affected row.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::RecordId;
use crate::domain::ports::{ReminderLog, ReminderLogError};

use super::models::NewReminderLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::reminder_log;

/// Diesel-backed sent-reminder ledger.
#[derive(Clone)]
pub struct DieselReminderLog {
    pool: DbPool,
}

impl DieselReminderLog {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReminderLogError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReminderLogError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReminderLogError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ReminderLogError::connection("database connection error")
        }
        _ => ReminderLogError::query("database error"),
    }
}

#[async_trait]
impl ReminderLog for DieselReminderLog {
    async fn try_claim(
        &self,
        record: RecordId,
        due_date: NaiveDate,
        day_offset: i64,
    ) -> Result<bool, ReminderLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(reminder_log::table)
            .values(NewReminderLogRow {
                record_id: *record.as_uuid(),
                due_date,
                day_offset,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }
}
