use super::super::common::db_failure;
use super::common::{RoundResponse, SessionResponse};
use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{job, round, round_session};
use sea_orm::{DbErr, EntityTrait};
use serde::Deserialize;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRoundRequest {
    pub name: String,
    pub position: i32,
}

/// POST `/api/jobs/{job_id}/rounds` (admin only)
///
/// Creates a round. The position must be free among the job's non-retired
/// rounds; collisions come back as 400 with the model's reason.
pub async fn create_round(
    State(app_state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(req): Json<CreateRoundRequest>,
) -> (StatusCode, Json<ApiResponse<RoundResponse>>) {
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

    match round::Model::create(db, job_id, &req.name, req.position).await {
        Ok(round) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                RoundResponse::from_parts(round, None),
                "Round created",
            )),
        ),
        Err(DbErr::Custom(msg)) => (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        Err(e) => db_failure(e),
    }
}

/// POST `/api/jobs/{job_id}/rounds/{round_id}/sessions` (admin only)
///
/// Opens a new check-in window for the round. Refused with 409 while the
/// round's latest session is still open.
pub async fn open_session(
    State(app_state): State<AppState>,
    Path((job_id, round_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = app_state.db();

    match round::Entity::find_by_id(round_id).one(db).await {
        Ok(Some(r)) if r.job_id == job_id => {}
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Round not found")),
            );
        }
        Err(e) => return db_failure(e),
    }

    match round_session::Model::open(db, round_id, claims.sub).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(session.into(), "Session opened")),
        ),
        Err(DbErr::Custom(msg)) => (StatusCode::CONFLICT, Json(ApiResponse::error(msg))),
        Err(e) => db_failure(e),
    }
}
