//! Authentication endpoints backed by the hosted auth service.
//!
//! The backend never sees password hashes; it forwards credentials to the
//! gateway and stores the resulting identity in the session cookie. First
//! sign-in also materialises the owner's profile row so reminder dispatch
//! has an address to write to.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AuthGatewayError, AuthenticatedUser};
use crate::domain::{ApiResult, EmailAddress, Error, Profile};
use crate::inbound::http::profile::map_profile_error;
use crate::inbound::http::{HttpState, SessionContext};

/// Password sign-in payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered address.
    pub email: EmailAddress,
    /// Plain password, forwarded to the auth service.
    pub password: String,
}

/// Account registration payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: EmailAddress,
    pub password: String,
}

/// Registration outcome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    /// When `true` the address must be confirmed before signing in.
    pub confirmation_required: bool,
}

/// One-time code request payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub email: EmailAddress,
}

/// One-time code verification payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub email: EmailAddress,
    /// Numeric code from the mail.
    pub code: String,
}

/// Password change payload for the signed-in account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

pub(crate) fn map_auth_error(error: AuthGatewayError) -> Error {
    match error {
        AuthGatewayError::InvalidCredentials => Error::unauthorized("invalid credentials"),
        AuthGatewayError::EmailNotConfirmed => {
            Error::unauthorized("email address not confirmed yet")
                .with_details(json!({ "reason": "email_not_confirmed" }))
        }
        AuthGatewayError::Transport { message } => Error::service_unavailable(message),
        AuthGatewayError::Protocol { message } => Error::internal(message),
    }
}

/// Create the profile row on first sign-in; later sign-ins are a no-op.
async fn ensure_profile(state: &HttpState, user: &AuthenticatedUser) -> ApiResult<Profile> {
    if let Some(existing) = state
        .profiles
        .find(&user.id)
        .await
        .map_err(map_profile_error)?
    {
        return Ok(existing);
    }
    let profile = Profile {
        id: user.id,
        email: user.email.clone(),
        full_name: None,
        secondary_email: None,
    };
    state
        .profiles
        .upsert(&profile)
        .await
        .map_err(map_profile_error)?;
    tracing::info!(owner = %user.id.as_uuid(), "created profile on first sign-in");
    Ok(profile)
}

async fn establish_session(
    state: &HttpState,
    session: &SessionContext,
    user: &AuthenticatedUser,
) -> ApiResult<Profile> {
    let profile = ensure_profile(state, user).await?;
    session.persist_identity(user)?;
    Ok(profile)
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Profile),
        (status = 401, description = "Invalid or unconfirmed credentials", body = Error),
        (status = 503, description = "Auth service unreachable", body = Error),
    )
)]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let user = state
        .auth
        .sign_in(&body.email, &body.password)
        .await
        .map_err(map_auth_error)?;
    let profile = establish_session(&state, &session, &user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 503, description = "Auth service unreachable", body = Error),
    )
)]
pub async fn sign_up(
    state: web::Data<HttpState>,
    body: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let outcome = state
        .auth
        .sign_up(&body.email, &body.password)
        .await
        .map_err(map_auth_error)?;
    Ok(HttpResponse::Created().json(SignUpResponse {
        confirmation_required: outcome.confirmation_required,
    }))
}

/// Request a passwordless one-time code by mail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/code",
    tag = "auth",
    request_body = CodeRequest,
    responses(
        (status = 202, description = "Code mail queued"),
        (status = 503, description = "Auth service unreachable", body = Error),
    )
)]
pub async fn request_code(
    state: web::Data<HttpState>,
    body: web::Json<CodeRequest>,
) -> ApiResult<HttpResponse> {
    state
        .auth
        .request_code(&body.email)
        .await
        .map_err(map_auth_error)?;
    Ok(HttpResponse::Accepted().finish())
}

/// Exchange a one-time code for a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    tag = "auth",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Signed in", body = Profile),
        (status = 401, description = "Unknown or expired code", body = Error),
    )
)]
pub async fn verify_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<VerifyCodeRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let user = state
        .auth
        .verify_code(&body.email, &body.code)
        .await
        .map_err(map_auth_error)?;
    let profile = establish_session(&state, &session, &user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Change the password of the signed-in account.
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    tag = "auth",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 401, description = "Not signed in", body = Error),
    )
)]
pub async fn update_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let token = session.require_access_token()?;
    state
        .auth
        .update_password(&token, &body.new_password)
        .await
        .map_err(map_auth_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// End the session.
///
/// Token revocation is best effort; a dead auth service must not trap the
/// user in a signed-in state.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses((status = 204, description = "Session cleared"))
)]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session.access_token()? {
        if let Err(error) = state.auth.sign_out(&token).await {
            tracing::warn!(%error, "server-side sign-out failed, clearing session anyway");
        }
    }
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use uuid::Uuid;

    use crate::domain::OwnerId;
    use crate::domain::ports::{
        MockAuthGateway, MockPhotoRepository, MockProfileRepository, MockRecordRepository,
        SignUpOutcome,
    };
    use crate::inbound::http::test_utils::{TEST_EMAIL, TEST_OWNER, mock_state};

    fn authenticated_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: OwnerId::from_uuid(Uuid::parse_str(TEST_OWNER).expect("fixture uuid")),
            email: EmailAddress::new(TEST_EMAIL).expect("fixture email"),
            access_token: "token-abc".to_owned(),
        }
    }

    async fn run(
        auth: MockAuthGateway,
        profiles: MockProfileRepository,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(mock_state(
                    auth,
                    MockRecordRepository::new(),
                    profiles,
                    MockPhotoRepository::new(),
                ))
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .configure(crate::inbound::http::configure),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn login_creates_profile_and_sets_cookie() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .withf(|email, password| email.as_str() == TEST_EMAIL && password == "hunter2")
            .times(1)
            .returning(|_, _| Ok(authenticated_user()));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().times(1).returning(|_| Ok(None));
        profiles
            .expect_upsert()
            .withf(|profile| profile.email.as_str() == TEST_EMAIL)
            .times(1)
            .returning(|_| Ok(()));

        let res = run(
            auth,
            profiles,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": TEST_EMAIL, "password": "hunter2" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let profile: Profile = test::read_body_json(res).await;
        assert_eq!(profile.email.as_str(), TEST_EMAIL);
    }

    #[actix_web::test]
    async fn login_keeps_existing_profile() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .returning(|_, _| Ok(authenticated_user()));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().times(1).returning(|owner| {
            Ok(Some(Profile {
                id: *owner,
                email: EmailAddress::new(TEST_EMAIL).expect("fixture email"),
                full_name: Some("Ayşe Yılmaz".to_owned()),
                secondary_email: None,
            }))
        });
        profiles.expect_upsert().times(0);

        let res = run(
            auth,
            profiles,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": TEST_EMAIL, "password": "hunter2" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let profile: Profile = test::read_body_json(res).await;
        assert_eq!(profile.full_name.as_deref(), Some("Ayşe Yılmaz"));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .returning(|_, _| Err(AuthGatewayError::InvalidCredentials));

        let res = run(
            auth,
            MockProfileRepository::new(),
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": TEST_EMAIL, "password": "wrong" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn unconfirmed_email_is_flagged_in_details() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .returning(|_, _| Err(AuthGatewayError::EmailNotConfirmed));

        let res = run(
            auth,
            MockProfileRepository::new(),
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": TEST_EMAIL, "password": "hunter2" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["reason"], "email_not_confirmed");
    }

    #[actix_web::test]
    async fn sign_up_reports_confirmation_requirement() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_up().times(1).returning(|_, _| {
            Ok(SignUpOutcome {
                confirmation_required: true,
            })
        });

        let res = run(
            auth,
            MockProfileRepository::new(),
            test::TestRequest::post()
                .uri("/api/v1/auth/signup")
                .set_json(json!({ "email": TEST_EMAIL, "password": "hunter2" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["confirmationRequired"], true);
    }

    #[actix_web::test]
    async fn code_request_is_accepted() {
        let mut auth = MockAuthGateway::new();
        auth.expect_request_code()
            .withf(|email| email.as_str() == TEST_EMAIL)
            .times(1)
            .returning(|_| Ok(()));

        let res = run(
            auth,
            MockProfileRepository::new(),
            test::TestRequest::post()
                .uri("/api/v1/auth/code")
                .set_json(json!({ "email": TEST_EMAIL })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn verify_code_signs_the_user_in() {
        let mut auth = MockAuthGateway::new();
        auth.expect_verify_code()
            .withf(|email, code| email.as_str() == TEST_EMAIL && code == "123456")
            .times(1)
            .returning(|_, _| Ok(authenticated_user()));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().returning(|_| Ok(None));
        profiles.expect_upsert().returning(|_| Ok(()));

        let res = run(
            auth,
            profiles,
            test::TestRequest::post()
                .uri("/api/v1/auth/verify")
                .set_json(json!({ "email": TEST_EMAIL, "code": "123456" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn password_change_requires_a_session() {
        let res = run(
            MockAuthGateway::new(),
            MockProfileRepository::new(),
            test::TestRequest::put()
                .uri("/api/v1/auth/password")
                .set_json(json!({ "newPassword": "s3cret!" })),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_clears_session_even_when_revocation_fails() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .returning(|_, _| Ok(authenticated_user()));
        auth.expect_sign_out()
            .times(1)
            .returning(|_| Err(AuthGatewayError::transport("connection refused")));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().returning(|_| Ok(None));
        profiles.expect_upsert().returning(|_| Ok(()));

        let app = test::init_service(
            App::new()
                .app_data(mock_state(
                    auth,
                    MockRecordRepository::new(),
                    profiles,
                    MockPhotoRepository::new(),
                ))
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .configure(crate::inbound::http::configure),
        )
        .await;

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "email": TEST_EMAIL, "password": "hunter2" }))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie present")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
