use super::super::common::db_failure;
use super::common::RoundResponse;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{job, round, round_session};
use sea_orm::EntityTrait;
use util::state::AppState;

/// GET `/api/jobs/{job_id}/rounds` (admin only)
///
/// All non-retired rounds of the job in position order, each with its latest
/// session folded in.
pub async fn list_rounds(
    State(app_state): State<AppState>,
    Path(job_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<RoundResponse>>>) {
    let db = app_state.db();

    match job::Entity::find_by_id(job_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Job not found")),
            );
        }
        Err(e) => return db_failure(e),
    }

    let rounds = match round::Model::active_for_job(db, job_id).await {
        Ok(rounds) => rounds,
        Err(e) => return db_failure(e),
    };

    let mut out = Vec::with_capacity(rounds.len());
    for r in rounds {
        let session = match round_session::Model::latest_for_round(db, r.id).await {
            Ok(session) => session,
            Err(e) => return db_failure(e),
        };
        out.push(RoundResponse::from_parts(r, session));
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(out, "Rounds retrieved")),
    )
}
