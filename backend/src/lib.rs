//! Pet vaccination tracking backend.
//!
//! Hexagonal layout: `domain` holds the scheduling and reminder policies
//! plus the ports, `inbound` the HTTP surface, `outbound` the PostgreSQL,
//! auth service, and SMTP adapters. The `paticheck-server` binary serves
//! the API; `paticheck-notifier` runs the daily reminder dispatch.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
