//! Port for pet photo persistence.

use async_trait::async_trait;

use crate::domain::photo::{NewPetPhoto, PetPhoto, PhotoId};
use crate::domain::record::{OwnerId, PetName};

/// Errors raised by photo repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoRepositoryError {
    /// Repository connection could not be established.
    #[error("photo store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("photo store query failed: {message}")]
    Query { message: String },
}

impl PhotoRepositoryError {
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

/// Port for pet photo storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Photos for one pet, newest first.
    async fn list_for_pet(
        &self,
        owner: &OwnerId,
        pet: &PetName,
    ) -> Result<Vec<PetPhoto>, PhotoRepositoryError>;

    /// Insert a new photo row, returning it with id and timestamp.
    async fn insert(&self, photo: &NewPetPhoto) -> Result<PetPhoto, PhotoRepositoryError>;

    /// Delete a photo by id, matching on owner. Returns `false` on no match.
    async fn delete(&self, owner: &OwnerId, id: PhotoId) -> Result<bool, PhotoRepositoryError>;

    /// Delete the oldest photos of a pet beyond `keep`, returning the number
    /// removed.
    async fn prune_oldest(
        &self,
        owner: &OwnerId,
        pet: &PetName,
        keep: usize,
    ) -> Result<usize, PhotoRepositoryError>;
}
