use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

/// Routes under `/api/jobs/{job_id}/checkin`.
///
/// `/status` serves the scanning student; `/confirm` is the admin-side scan
/// endpoint and carries its own admin guard on top of the shared
/// authentication layer.
pub fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(get::checkin_status))
        .route(
            "/confirm",
            post(post::confirm_checkin).route_layer(from_fn(allow_admin)),
        )
}
