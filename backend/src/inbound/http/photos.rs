//! Pet photo endpoints.
//!
//! Photos are stored as URLs pointing at an external object store; this
//! adapter only tracks them per (owner, pet) and keeps at most
//! [`PHOTOS_PER_PET`] per pet by pruning oldest-first after each upload.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::PhotoRepositoryError;
use crate::domain::{ApiResult, Error, NewPetPhoto, PHOTOS_PER_PET, PetName, PetPhoto, PhotoId};
use crate::inbound::http::{HttpState, SessionContext};

pub(crate) fn map_photo_error(error: PhotoRepositoryError) -> Error {
    match error {
        PhotoRepositoryError::Connection { message } => Error::service_unavailable(message),
        PhotoRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Payload for registering a photo.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotoRequest {
    /// Pet the photo belongs to.
    pub pet_name: PetName,
    /// Absolute URL of the stored image.
    pub photo_url: String,
}

/// List a pet's photos, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/pets/{pet}/photos",
    tag = "photos",
    params(("pet" = String, Path, description = "Pet name")),
    responses(
        (status = 200, description = "Photos for the pet", body = [PetPhoto]),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn list_photos(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let pet = PetName::new(path.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let photos = state
        .photos
        .list_for_pet(&owner, &pet)
        .await
        .map_err(map_photo_error)?;
    Ok(HttpResponse::Ok().json(photos))
}

/// Register a photo URL and prune the pet's oldest photos beyond the cap.
#[utoipa::path(
    post,
    path = "/api/v1/photos",
    tag = "photos",
    request_body = AddPhotoRequest,
    responses(
        (status = 201, description = "Stored photo", body = PetPhoto),
        (status = 400, description = "URL is not absolute", body = Error),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn add_photo(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<AddPhotoRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let body = body.into_inner();
    let url = Url::parse(&body.photo_url).map_err(|error| {
        Error::invalid_request(format!("photoUrl must be an absolute URL: {error}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_request("photoUrl must use http or https")
            .with_details(json!({ "scheme": url.scheme() })));
    }

    let photo = state
        .photos
        .insert(&NewPetPhoto {
            owner_id: owner,
            pet_name: body.pet_name,
            photo_url: url.into(),
        })
        .await
        .map_err(map_photo_error)?;
    let pruned = state
        .photos
        .prune_oldest(&owner, &photo.pet_name, PHOTOS_PER_PET)
        .await
        .map_err(map_photo_error)?;
    if pruned > 0 {
        tracing::debug!(
            owner = %owner.as_uuid(),
            pet = %photo.pet_name,
            pruned,
            "pruned photos beyond the per-pet cap"
        );
    }
    Ok(HttpResponse::Created().json(photo))
}

/// Delete one photo by id.
#[utoipa::path(
    delete,
    path = "/api/v1/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such photo for this owner", body = Error),
    )
)]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let id = PhotoId::from_uuid(path.into_inner());
    let deleted = state
        .photos
        .delete(&owner, id)
        .await
        .map_err(map_photo_error)?;
    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found("no such photo"))
    }
}
