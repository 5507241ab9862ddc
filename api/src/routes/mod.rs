//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → login (public)
//! - `/jobs/{job_id}/checkin` → the check-in core (student status/issue,
//!   admin confirm)
//! - `/jobs/{job_id}/rounds` → round and session administration (admin-only)

use crate::auth::guards::allow_authenticated;
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod auth;
pub mod health;
pub mod jobs;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest(
            "/jobs",
            jobs::jobs_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
