use axum::Router;
use util::state::AppState;

pub mod checkin;
pub mod common;
pub mod rounds;

/// Routes under `/api/jobs/{job_id}`. The whole tree sits behind the
/// authentication guard; admin-only routes add their own layer.
pub fn jobs_routes() -> Router<AppState> {
    Router::new()
        .nest("/{job_id}/checkin", checkin::checkin_routes())
        .nest("/{job_id}/rounds", rounds::rounds_routes())
}
