//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The original product kept the signed-in user in ambient dashboard state;
//! here the session is an explicit object handed to each handler. The
//! cookie stores the owner id, the auth access token, and the sign-in
//! email.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::ports::AuthenticatedUser;
use crate::domain::{EmailAddress, Error, OwnerId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const EMAIL_KEY: &str = "email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist a freshly authenticated identity in the session cookie.
    pub fn persist_identity(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id.as_uuid().to_string())
            .and_then(|()| self.0.insert(ACCESS_TOKEN_KEY, user.access_token.clone()))
            .and_then(|()| self.0.insert(EMAIL_KEY, user.email.as_str().to_owned()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop everything stored in the session.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Fetch the current owner id from the session, if present.
    pub fn owner_id(&self) -> Result<Option<OwnerId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Ok(Some(OwnerId::from_uuid(id))),
                Err(error) => {
                    tracing::warn!("invalid owner id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated owner id or return `401 Unauthorized`.
    pub fn require_owner(&self) -> Result<OwnerId, Error> {
        self.owner_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Fetch the stored access token, if present.
    pub fn access_token(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require the access token or return `401 Unauthorized`.
    pub fn require_access_token(&self) -> Result<String, Error> {
        self.access_token()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Fetch the sign-in email address, if present and still valid.
    pub fn email(&self) -> Result<Option<EmailAddress>, Error> {
        let raw = self
            .0
            .get::<String>(EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match EmailAddress::new(&raw) {
                Ok(email) => Ok(Some(email)),
                Err(error) => {
                    tracing::warn!("invalid email in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn identity() -> AuthenticatedUser {
        AuthenticatedUser {
            id: OwnerId::from_uuid(
                Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture uuid"),
            ),
            email: EmailAddress::new("owner@example.com").expect("fixture email"),
            access_token: "token-123".to_owned(),
        }
    }

    async fn set_identity(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist_identity(&identity())?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn require_identity(session: SessionContext) -> Result<HttpResponse, Error> {
        let owner = session.require_owner()?;
        let token = session.require_access_token()?;
        Ok(HttpResponse::Ok().body(format!("{}:{token}", owner.as_uuid())))
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie present")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_identity() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/set", web::get().to(set_identity))
                .route("/get", web::get().to(require_identity)),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6:token-123");
    }

    #[actix_web::test]
    async fn missing_identity_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/require", web::get().to(require_identity)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_owner_id_is_unauthorised() {
        async fn set_invalid(session: Session) -> HttpResponse {
            session
                .insert(USER_ID_KEY, "not-a-uuid")
                .expect("set invalid owner id");
            HttpResponse::Ok().finish()
        }

        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/set-invalid", web::get().to(set_invalid))
                .route("/require", web::get().to(require_identity)),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn purge_clears_the_identity() {
        async fn clear(session: SessionContext) -> HttpResponse {
            session.purge();
            HttpResponse::NoContent().finish()
        }

        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route("/set", web::get().to(set_identity))
                .route("/clear", web::get().to(clear))
                .route("/require", web::get().to(require_identity)),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let clear_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/clear")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cleared_cookie = session_cookie(&clear_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cleared_cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
