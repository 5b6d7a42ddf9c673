//! Outbound adapters implementing the domain's driven ports.

pub mod auth;
pub mod mailer;
pub mod persistence;
pub mod wakeup;
