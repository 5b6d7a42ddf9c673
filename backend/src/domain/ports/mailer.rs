//! Port for outbound reminder mail.

use async_trait::async_trait;

use crate::domain::profile::EmailAddress;

/// Errors raised by mailer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The SMTP relay could not be reached or the session failed.
    #[error("mail transport failed: {message}")]
    Transport { message: String },

    /// The relay accepted the session but rejected the message.
    #[error("mail rejected: {message}")]
    Rejected { message: String },
}

impl MailerError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a rejection error with the given message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// A rendered HTML message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Port for submitting one message to the mail relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submit a single message. One failure must not poison the session
    /// for subsequent sends.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}
