use super::super::common::db_failure;
use super::common::{RoundResponse, SessionResponse};
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{round, round_session};
use sea_orm::{DbErr, EntityTrait};
use serde::Deserialize;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRoundRequest {
    pub retired: bool,
}

/// PUT `/api/jobs/{job_id}/rounds/{round_id}` (admin only)
///
/// Retires a round. Retirement is one-way; history stays, the round drops
/// out of listings and eligibility.
pub async fn update_round(
    State(app_state): State<AppState>,
    Path((job_id, round_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateRoundRequest>,
) -> (StatusCode, Json<ApiResponse<RoundResponse>>) {
    let db = app_state.db();

    if !req.retired {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Rounds cannot be un-retired")),
        );
    }

    let round = match round::Entity::find_by_id(round_id).one(db).await {
        Ok(Some(r)) if r.job_id == job_id => r,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Round not found")),
            );
        }
        Err(e) => return db_failure(e),
    };

    match round.retire(db).await {
        Ok(round) => {
            let session = match round_session::Model::latest_for_round(db, round.id).await {
                Ok(session) => session,
                Err(e) => return db_failure(e),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    RoundResponse::from_parts(round, session),
                    "Round retired",
                )),
            )
        }
        Err(e) => db_failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionSessionRequest {
    pub status: round_session::Status,
}

/// PUT `/api/jobs/{job_id}/rounds/{round_id}/sessions/{session_id}` (admin only)
///
/// Moves the session through its lifecycle. Illegal transitions are rejected
/// with 409 and the model's reason.
pub async fn transition_session(
    State(app_state): State<AppState>,
    Path((job_id, round_id, session_id)): Path<(i64, i64, i64)>,
    Json(req): Json<TransitionSessionRequest>,
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

    let session = match round_session::Entity::find_by_id(session_id).one(db).await {
        Ok(Some(s)) if s.round_id == round_id => s,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Session not found")),
            );
        }
        Err(e) => return db_failure(e),
    };

    match session.transition(db, req.status).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(session.into(), "Session updated")),
        ),
        Err(DbErr::Custom(msg)) => (StatusCode::CONFLICT, Json(ApiResponse::error(msg))),
        Err(e) => db_failure(e),
    }
}
