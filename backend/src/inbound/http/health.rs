//! Liveness and readiness probes.
//!
//! `/health/live` answers as soon as the process serves requests;
//! `/health/ready` stays `503` until startup marks the database reachable
//! and flips back if a later check fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Shared readiness flag, flipped by startup and background checks.
#[derive(Clone, Default)]
pub struct HealthState {
    ready: Arc<AtomicBool>,
}

impl HealthState {
    /// New state, not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service ready (or not) to receive traffic.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Current readiness.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `"ok"` or `"unavailable"`.
    pub status: &'static str,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses((status = 200, description = "Process is serving requests", body = HealthResponse))
)]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Dependencies reachable", body = HealthResponse),
        (status = 503, description = "Still starting or dependencies down", body = HealthResponse),
    )
)]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HttpResponse::Ok().json(HealthResponse { status: "ok" })
    } else {
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unavailable",
        })
    }
}

/// Mount both probes outside the versioned API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health/live", web::get().to(live))
        .route("/health/ready", web::get().to(ready));
}
