//! Lettre-backed SMTP submission for reminder mail.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::ports::{Mailer, MailerError, OutboundEmail};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname, e.g. `smtp.gmail.com`.
    pub host: String,
    /// Submission port; 587 for STARTTLS.
    pub port: u16,
    /// Account used to authenticate.
    pub username: String,
    /// App password or token for the account.
    pub password: String,
    /// From header, e.g. `PatiCheck <noreply@example.com>`.
    pub from: String,
}

/// Mailer submitting over STARTTLS with credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Build the transport from relay settings.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Transport`] when the relay host is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|error| MailerError::transport(error.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|error| MailerError::rejected(format!("bad from address: {error}")))?,
            )
            .to(email
                .to
                .as_str()
                .parse()
                .map_err(|error| MailerError::rejected(format!("bad recipient: {error}")))?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|error| MailerError::rejected(error.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|error| {
                if error.is_permanent() {
                    MailerError::rejected(error.to_string())
                } else {
                    MailerError::transport(error.to_string())
                }
            })
            .map(|_| ())
    }
}

/// Mailer that logs instead of sending, for dry runs.
#[derive(Debug, Default, Clone)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            bytes = email.html_body.len(),
            "dry run, not sending"
        );
        Ok(())
    }
}
