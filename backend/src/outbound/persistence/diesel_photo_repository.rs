//! PostgreSQL-backed [`PhotoRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PhotoRepository, PhotoRepositoryError};
use crate::domain::{NewPetPhoto, OwnerId, PetName, PetPhoto, PhotoId};

use super::models::{NewPetPhotoRow, PetPhotoRow};
use super::pool::{DbPool, PoolError};
use super::schema::pet_photos;

/// Diesel-backed pet photo storage.
#[derive(Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PhotoRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PhotoRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PhotoRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PhotoRepositoryError::connection("database connection error")
        }
        _ => PhotoRepositoryError::query("database error"),
    }
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn list_for_pet(
        &self,
        owner: &OwnerId,
        pet: &PetName,
    ) -> Result<Vec<PetPhoto>, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetPhotoRow> = pet_photos::table
            .filter(pet_photos::owner_id.eq(owner.as_uuid()))
            .filter(pet_photos::pet_name.eq(pet.as_str()))
            .order(pet_photos::created_at.desc())
            .select(PetPhotoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(PhotoRepositoryError::query))
            .collect()
    }

    async fn insert(&self, photo: &NewPetPhoto) -> Result<PetPhoto, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: PetPhotoRow = diesel::insert_into(pet_photos::table)
            .values(NewPetPhotoRow {
                owner_id: *photo.owner_id.as_uuid(),
                pet_name: photo.pet_name.as_str().to_owned(),
                photo_url: photo.photo_url.clone(),
            })
            .returning(PetPhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain().map_err(PhotoRepositoryError::query)
    }

    async fn delete(&self, owner: &OwnerId, id: PhotoId) -> Result<bool, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            pet_photos::table
                .filter(pet_photos::id.eq(id.as_uuid()))
                .filter(pet_photos::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected == 1)
    }

    async fn prune_oldest(
        &self,
        owner: &OwnerId,
        pet: &PetName,
        keep: usize,
    ) -> Result<usize, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // ids to keep: the newest `keep` photos of this pet.
        let keep_limit = i64::try_from(keep).unwrap_or(i64::MAX);
        let keepers = pet_photos::table
            .filter(pet_photos::owner_id.eq(owner.as_uuid()))
            .filter(pet_photos::pet_name.eq(pet.as_str()))
            .order(pet_photos::created_at.desc())
            .limit(keep_limit)
            .select(pet_photos::id);
        let keeper_ids: Vec<uuid::Uuid> =
            keepers.load(&mut conn).await.map_err(map_diesel_error)?;
        let removed = diesel::delete(
            pet_photos::table
                .filter(pet_photos::owner_id.eq(owner.as_uuid()))
                .filter(pet_photos::pet_name.eq(pet.as_str()))
                .filter(pet_photos::id.ne_all(keeper_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed)
    }
}
