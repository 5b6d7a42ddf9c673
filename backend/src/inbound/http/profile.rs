//! Owner profile endpoints.
//!
//! The primary email always mirrors the auth service account; only the
//! display name and the secondary notification address are editable here.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::ProfileRepositoryError;
use crate::domain::{ApiResult, EmailAddress, Error, Profile};
use crate::inbound::http::{HttpState, SessionContext};

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => Error::service_unavailable(message),
        ProfileRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Editable profile fields.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Display name; `null` clears it.
    pub full_name: Option<String>,
    /// Second reminder address; `null` clears it.
    pub secondary_email: Option<EmailAddress>,
}

/// Fetch the signed-in owner's profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Profile not initialised", body = Error),
    )
)]
pub async fn fetch_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let profile = state
        .profiles
        .find(&owner)
        .await
        .map_err(map_profile_error)?
        .ok_or_else(|| Error::not_found("profile not initialised"))?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Update the display name and secondary reminder address.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Profile not initialised", body = Error),
    )
)]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_owner()?;
    let body = body.into_inner();
    let mut profile = state
        .profiles
        .find(&owner)
        .await
        .map_err(map_profile_error)?
        .ok_or_else(|| Error::not_found("profile not initialised"))?;
    profile.full_name = body
        .full_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());
    profile.secondary_email = body.secondary_email;
    state
        .profiles
        .upsert(&profile)
        .await
        .map_err(map_profile_error)?;
    Ok(HttpResponse::Ok().json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::json;

    use crate::domain::ports::{
        MockAuthGateway, MockPhotoRepository, MockProfileRepository, MockRecordRepository,
    };
    use crate::inbound::http::test_utils::{
        TEST_EMAIL, mock_state, seed_identity, sign_in_cookie, test_owner,
    };

    fn stored_profile() -> Profile {
        Profile {
            id: test_owner(),
            email: EmailAddress::new(TEST_EMAIL).expect("fixture email"),
            full_name: None,
            secondary_email: None,
        }
    }

    async fn app_with(
        profiles: MockProfileRepository,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(mock_state(
                    MockAuthGateway::new(),
                    MockRecordRepository::new(),
                    profiles,
                    MockPhotoRepository::new(),
                ))
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/test/session", web::post().to(seed_identity))
                .configure(crate::inbound::http::configure),
        )
        .await
    }

    #[actix_web::test]
    async fn fetch_requires_a_session() {
        let app = app_with(MockProfileRepository::new()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/profile").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn fetch_returns_the_stored_profile() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find()
            .withf(|owner| *owner == test_owner())
            .times(1)
            .returning(|_| Ok(Some(stored_profile())));
        let app = app_with(profiles).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let profile: Profile = test::read_body_json(res).await;
        assert_eq!(profile.email.as_str(), TEST_EMAIL);
    }

    #[actix_web::test]
    async fn update_trims_name_and_keeps_primary_email() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find()
            .returning(|_| Ok(Some(stored_profile())));
        profiles
            .expect_upsert()
            .withf(|profile| {
                profile.full_name.as_deref() == Some("Ayşe Yılmaz")
                    && profile.email.as_str() == TEST_EMAIL
                    && profile
                        .secondary_email
                        .as_ref()
                        .is_some_and(|email| email.as_str() == "partner@example.com")
            })
            .times(1)
            .returning(|_| Ok(()));
        let app = app_with(profiles).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .set_json(json!({
                    "fullName": "  Ayşe Yılmaz  ",
                    "secondaryEmail": "partner@example.com",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn update_rejects_a_malformed_secondary_email() {
        let app = app_with(MockProfileRepository::new()).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .set_json(json!({ "secondaryEmail": "not-an-address" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn connection_failures_surface_as_unavailable() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find()
            .returning(|_| Err(ProfileRepositoryError::connection("pool exhausted")));
        let app = app_with(profiles).await;
        let cookie = sign_in_cookie(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/profile")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
