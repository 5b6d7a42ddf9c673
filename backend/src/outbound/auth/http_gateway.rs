//! Reqwest-backed gateway to the hosted auth service.
//!
//! Owns transport details only: request shaping, status and error-body
//! mapping, and decoding session payloads into the domain identity. No
//! credential ever lands in a log line.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{AuthGateway, AuthGatewayError, AuthenticatedUser, SignUpOutcome};
use crate::domain::{EmailAddress, OwnerId};

use super::dto::{
    AuthErrorDto, CredentialsDto, OtpRequestDto, PasswordUpdateDto, SessionDto, SignUpDto,
    VerifyDto,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Gateway speaking the GoTrue HTTP API.
pub struct HttpAuthGateway {
    client: Client,
    base_url: Url,
    anon_key: String,
}

impl HttpAuthGateway {
    /// Build a gateway against the service base URL (the `/auth/v1` root).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, anon_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        // `Url::join` drops the last segment of a base without a trailing
        // slash, so `/auth/v1` would resolve `token` to `/auth/token`.
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Self {
            client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthGatewayError> {
        self.base_url
            .join(path)
            .map_err(|error| AuthGatewayError::protocol(format!("invalid auth url: {error}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_str())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AuthGatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: AuthErrorDto = response.json().await.unwrap_or_default();
        Err(classify_failure(status, body.description()))
    }

    async fn session_from(response: reqwest::Response) -> Result<AuthenticatedUser, AuthGatewayError> {
        let session: SessionDto = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|error| AuthGatewayError::protocol(format!("bad session payload: {error}")))?;
        let email = session
            .user
            .email
            .as_deref()
            .ok_or_else(|| AuthGatewayError::protocol("session user carries no email"))?;
        let email = EmailAddress::new(email).map_err(|error| {
            AuthGatewayError::protocol(format!("session user email invalid: {error}"))
        })?;
        Ok(AuthenticatedUser {
            id: OwnerId::from_uuid(session.user.id),
            email,
            access_token: session.access_token,
        })
    }
}

/// Map an error status and description onto the port's categories.
fn classify_failure(status: StatusCode, description: &str) -> AuthGatewayError {
    let lowered = description.to_ascii_lowercase();
    if lowered.contains("not confirmed") {
        return AuthGatewayError::EmailNotConfirmed;
    }
    if status == StatusCode::BAD_REQUEST
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status == StatusCode::UNPROCESSABLE_ENTITY
    {
        if lowered.contains("invalid") || lowered.contains("expired") || lowered.is_empty() {
            return AuthGatewayError::InvalidCredentials;
        }
    }
    if status.is_server_error() {
        return AuthGatewayError::transport(format!("auth service returned {status}"));
    }
    AuthGatewayError::protocol(format!("auth service returned {status}: {description}"))
}

fn map_send_error(error: reqwest::Error) -> AuthGatewayError {
    if error.is_timeout() || error.is_connect() {
        AuthGatewayError::transport(error.to_string())
    } else {
        AuthGatewayError::protocol(error.to_string())
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthGatewayError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&CredentialsDto {
                email: email.as_str(),
                password,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        Self::session_from(response).await
    }

    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SignUpOutcome, AuthGatewayError> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint("signup")?)
            .json(&CredentialsDto {
                email: email.as_str(),
                password,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        let body: SignUpDto = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|error| AuthGatewayError::protocol(format!("bad signup payload: {error}")))?;
        Ok(SignUpOutcome {
            confirmation_required: body.access_token.is_none()
                || body.confirmation_sent_at.is_some(),
        })
    }

    async fn request_code(&self, email: &EmailAddress) -> Result<(), AuthGatewayError> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint("otp")?)
            .json(&OtpRequestDto {
                email: email.as_str(),
                create_user: false,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        Self::check(response).await.map(|_| ())
    }

    async fn verify_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<AuthenticatedUser, AuthGatewayError> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint("verify")?)
            .json(&VerifyDto {
                email: email.as_str(),
                token: code,
                kind: "email",
            })
            .send()
            .await
            .map_err(map_send_error)?;
        Self::session_from(response).await
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), AuthGatewayError> {
        let response = self
            .request(reqwest::Method::PUT, self.endpoint("user")?)
            .bearer_auth(access_token)
            .json(&PasswordUpdateDto {
                password: new_password,
            })
            .send()
            .await
            .map_err(map_send_error)?;
        Self::check(response).await.map(|_| ())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthGatewayError> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint("logout")?)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_send_error)?;
        Self::check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, "Invalid login credentials")]
    #[case(StatusCode::UNAUTHORIZED, "")]
    #[case(StatusCode::FORBIDDEN, "Token has expired or is invalid")]
    fn credential_failures_map_to_invalid_credentials(
        #[case] status: StatusCode,
        #[case] description: &str,
    ) {
        assert_eq!(
            classify_failure(status, description),
            AuthGatewayError::InvalidCredentials
        );
    }

    #[rstest]
    fn unconfirmed_email_is_its_own_category() {
        assert_eq!(
            classify_failure(StatusCode::BAD_REQUEST, "Email not confirmed"),
            AuthGatewayError::EmailNotConfirmed
        );
    }

    #[rstest]
    fn server_errors_map_to_transport() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, "upstream error"),
            AuthGatewayError::Transport { .. }
        ));
    }

    #[rstest]
    fn unexpected_statuses_map_to_protocol() {
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "over email rate limit"),
            AuthGatewayError::Protocol { .. }
        ));
    }
}
