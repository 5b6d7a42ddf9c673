//! Shared fixtures for handler tests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::domain::ports::{
    AuthenticatedUser, MockAuthGateway, MockPhotoRepository, MockProfileRepository,
    MockRecordRepository,
};
use crate::domain::{EmailAddress, Error, OwnerId};
use crate::inbound::http::{HttpState, SessionContext};

/// Fixed owner used by handler tests that need a signed-in session.
pub(crate) const TEST_OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub(crate) const TEST_EMAIL: &str = "owner@example.com";

pub(crate) fn test_owner() -> OwnerId {
    OwnerId::from_uuid(Uuid::parse_str(TEST_OWNER).expect("fixture uuid"))
}

/// Cookie session middleware with a throwaway key, mirroring production
/// wiring minus the secure flag.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Bundle mocks into the shared state handlers expect.
pub(crate) fn mock_state(
    auth: MockAuthGateway,
    records: MockRecordRepository,
    profiles: MockProfileRepository,
    photos: MockPhotoRepository,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(records),
        Arc::new(profiles),
        Arc::new(photos),
    ))
}

/// Test-only handler that signs the fixed owner into the session.
///
/// Register it at a throwaway route, call it once, and reuse the returned
/// cookie for authenticated requests.
pub(crate) async fn seed_identity(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_identity(&AuthenticatedUser {
        id: test_owner(),
        email: EmailAddress::new(TEST_EMAIL).expect("fixture email"),
        access_token: "test-token".to_owned(),
    })?;
    Ok(HttpResponse::Ok().finish())
}

/// Sign in via the seeded route and return the session cookie.
pub(crate) async fn sign_in_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri("/test/session")
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie present")
        .into_owned()
}
