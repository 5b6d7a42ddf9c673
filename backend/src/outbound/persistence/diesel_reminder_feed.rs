//! PostgreSQL-backed [`ReminderFeed`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::Profile;
use crate::domain::VaccinationRecord;
use crate::domain::ports::{ReminderFeed, ReminderFeedError};

use super::models::{ProfileRow, VaccinationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{profiles, vaccinations};

/// Diesel-backed feed joining every record with its owner's profile.
#[derive(Clone)]
pub struct DieselReminderFeed {
    pool: DbPool,
}

impl DieselReminderFeed {
    /// Create a new feed with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReminderFeedError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReminderFeedError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReminderFeedError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ReminderFeedError::connection("database connection error")
        }
        _ => ReminderFeedError::query("database error"),
    }
}

#[async_trait]
impl ReminderFeed for DieselReminderFeed {
    async fn records_with_recipients(
        &self,
    ) -> Result<Vec<(VaccinationRecord, Profile)>, ReminderFeedError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Inner join: records without a profile row cannot be addressed, so
        // the dispatcher never sees them. They are not silently fine though.
        let rows: Vec<(VaccinationRow, ProfileRow)> = vaccinations::table
            .inner_join(profiles::table)
            .select((VaccinationRow::as_select(), ProfileRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut out = Vec::with_capacity(rows.len());
        for (record_row, profile_row) in rows {
            let record_id = record_row.id;
            match (record_row.into_domain(), profile_row.into_domain()) {
                (Ok(record), Ok(profile)) => out.push((record, profile)),
                (Err(message), _) | (_, Err(message)) => {
                    warn!(record = %record_id, message, "skipping unreadable reminder row");
                }
            }
        }
        Ok(out)
    }
}
