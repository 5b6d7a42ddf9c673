//! Owner profile data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::record::OwnerId;

/// Validation errors for profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a local part and a domain"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

/// Email address with a light structural check.
///
/// Deliverability is the hosted auth service's problem; this only rejects
/// values that cannot possibly be addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProfileValidationError::EmptyEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(ProfileValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ProfileValidationError::InvalidEmail);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ProfileValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account profile referenced by every vaccination record.
///
/// One per authenticated user; created on first sign-in from the auth
/// service's user object and editable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Account identifier, shared with the auth service.
    pub id: OwnerId,
    /// Primary notification address.
    pub email: EmailAddress,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Optional second notification address.
    pub secondary_email: Option<EmailAddress>,
}

impl Profile {
    /// All addresses that should receive reminder mail, primary first.
    pub fn recipients(&self) -> Vec<&EmailAddress> {
        let mut out = vec![&self.email];
        if let Some(secondary) = &self.secondary_email {
            out.push(secondary);
        }
        out
    }
}
