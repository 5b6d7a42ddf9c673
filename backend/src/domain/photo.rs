//! Pet photo data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::record::{OwnerId, PetName};

/// Photos retained per pet. Older rows are pruned past this count on
/// insert; a convention carried over from the original product, not a
/// database constraint.
pub const PHOTOS_PER_PET: usize = 3;

/// Stable photo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PhotoId(Uuid);

impl PhotoId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored photo URL for a pet, keyed by (owner, pet name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetPhoto {
    /// Primary key.
    pub id: PhotoId,
    /// Owning account.
    pub owner_id: OwnerId,
    /// Pet the photo belongs to.
    pub pet_name: PetName,
    /// Public URL of the stored image.
    pub photo_url: String,
    /// Upload timestamp, used for oldest-first pruning.
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a new pet photo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPetPhoto {
    /// Owning account.
    pub owner_id: OwnerId,
    /// Pet the photo belongs to.
    pub pet_name: PetName,
    /// Public URL of the stored image.
    pub photo_url: String,
}
