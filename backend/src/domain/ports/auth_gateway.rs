//! Port for the hosted authentication collaborator.
//!
//! Credential storage, confirmation mail, and one-time codes all live in
//! the hosted service; this port only exchanges request/response payloads
//! with it. The session cookie holds what comes back.

use async_trait::async_trait;

use crate::domain::profile::EmailAddress;
use crate::domain::record::OwnerId;

/// Errors raised by auth gateway adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthGatewayError {
    /// Wrong email/password or unknown one-time code.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but its email address is not confirmed yet.
    #[error("email address not confirmed")]
    EmailNotConfirmed,

    /// The auth service could not be reached.
    #[error("auth service unreachable: {message}")]
    Transport { message: String },

    /// The auth service answered with something unexpected.
    #[error("auth service protocol error: {message}")]
    Protocol { message: String },
}

impl AuthGatewayError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a protocol error with the given message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Identity returned by a successful sign-in or code verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier.
    pub id: OwnerId,
    /// Address the account is registered under.
    pub email: EmailAddress,
    /// Bearer token for subsequent user-scoped auth calls.
    pub access_token: String,
}

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// Whether the service wants the address confirmed before sign-in.
    pub confirmation_required: bool,
}

/// Port for the hosted auth service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Password sign-in.
    async fn sign_in(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthGatewayError>;

    /// Register a new account.
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SignUpOutcome, AuthGatewayError>;

    /// Request a passwordless one-time code by mail.
    async fn request_code(&self, email: &EmailAddress) -> Result<(), AuthGatewayError>;

    /// Exchange a one-time code for an identity.
    async fn verify_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<AuthenticatedUser, AuthGatewayError>;

    /// Change the password of the signed-in account.
    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), AuthGatewayError>;

    /// Invalidate the access token server-side.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthGatewayError>;
}
