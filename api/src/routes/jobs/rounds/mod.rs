use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;
pub mod put;

/// Admin routes under `/api/jobs/{job_id}/rounds`: round creation and
/// retirement, plus the session lifecycle (open, transition).
pub fn rounds_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_rounds).post(post::create_round))
        .route("/{round_id}", put(put::update_round))
        .route("/{round_id}/sessions", post(post::open_session))
        .route(
            "/{round_id}/sessions/{session_id}",
            put(put::transition_session),
        )
        .route_layer(from_fn(allow_admin))
}
