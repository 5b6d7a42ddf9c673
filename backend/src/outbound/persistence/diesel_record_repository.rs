//! PostgreSQL-backed [`RecordRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{RecordRepository, RecordRepositoryError};
use crate::domain::{NewVaccinationRecord, OwnerId, VaccinationRecord};

use super::models::{NewVaccinationRow, VaccinationRow, VaccinationUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::vaccinations;

/// Diesel-backed vaccination record storage.
#[derive(Clone)]
pub struct DieselRecordRepository {
    pool: DbPool,
}

impl DieselRecordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RecordRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordRepositoryError::connection("database connection error")
        }
        _ => RecordRepositoryError::query("database error"),
    }
}

fn map_row_error(message: String) -> RecordRepositoryError {
    RecordRepositoryError::query(message)
}

fn insert_row(record: &NewVaccinationRecord) -> NewVaccinationRow {
    NewVaccinationRow {
        owner_id: *record.owner_id.as_uuid(),
        pet_name: record.pet_name.as_str().to_owned(),
        vaccine_type: record.vaccine_type.as_db_value().to_owned(),
        date_applied: record.date_applied,
        next_due_date: record.next_due_date,
        weight_kg: record.weight_kg.value(),
        notes: record.notes.clone(),
    }
}

#[async_trait]
impl RecordRepository for DieselRecordRepository {
    async fn list_for_owner(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<VaccinationRecord>, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<VaccinationRow> = vaccinations::table
            .filter(vaccinations::owner_id.eq(owner.as_uuid()))
            .order(vaccinations::next_due_date.asc())
            .select(VaccinationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(map_row_error))
            .collect()
    }

    async fn insert(
        &self,
        record: &NewVaccinationRecord,
    ) -> Result<VaccinationRecord, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: VaccinationRow = diesel::insert_into(vaccinations::table)
            .values(insert_row(record))
            .returning(VaccinationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain().map_err(map_row_error)
    }

    async fn update_owned(
        &self,
        owner: &OwnerId,
        record: &VaccinationRecord,
    ) -> Result<bool, RecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = VaccinationUpdate {
            pet_name: record.pet_name.as_str().to_owned(),
            vaccine_type: record.vaccine_type.as_db_value().to_owned(),
            date_applied: record.date_applied,
            next_due_date: record.next_due_date,
            weight_kg: record.weight_kg.value(),
            notes: record.notes.clone(),
        };
        let affected = diesel::update(
            vaccinations::table
                .filter(vaccinations::id.eq(record.id.as_uuid()))
                .filter(vaccinations::owner_id.eq(owner.as_uuid())),
        )
        .set(changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected == 1)
    }
}
