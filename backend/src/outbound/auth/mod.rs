//! Hosted auth service adapter.

pub(crate) mod dto;
pub mod http_gateway;

pub use http_gateway::HttpAuthGateway;
