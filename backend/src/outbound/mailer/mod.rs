//! Outbound mail adapters.

pub mod smtp;

pub use smtp::{LoggingMailer, SmtpConfig, SmtpMailer};
