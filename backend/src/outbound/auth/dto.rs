//! Wire payloads for the hosted auth service.
//!
//! The service speaks the GoTrue API: token grants, signup, one-time codes
//! and user updates. Only the fields the gateway reads are modelled;
//! everything else passes through untouched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for password grants and signups.
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body to request a one-time code by mail.
#[derive(Debug, Serialize)]
pub(crate) struct OtpRequestDto<'a> {
    pub email: &'a str,
    /// Unknown addresses must not create accounts.
    pub create_user: bool,
}

/// Body to exchange a one-time code.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyDto<'a> {
    pub email: &'a str,
    pub token: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// Body to change the password of the signed-in account.
#[derive(Debug, Serialize)]
pub(crate) struct PasswordUpdateDto<'a> {
    pub password: &'a str,
}

/// User object embedded in auth responses.
#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Successful token grant.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionDto {
    pub access_token: String,
    pub user: UserDto,
}

/// Signup response; a session appears only when confirmation is disabled.
#[derive(Debug, Deserialize)]
pub(crate) struct SignUpDto {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub confirmation_sent_at: Option<String>,
}

/// Error body; the service is inconsistent about which field it fills.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthErrorDto {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthErrorDto {
    /// Best available description, whichever field the service used.
    pub(crate) fn description(&self) -> &str {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .unwrap_or("")
    }
}
