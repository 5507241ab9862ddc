use super::common::AttendanceRecordResponse;
use crate::auth::claims::AuthUser;
use crate::checkin::{TokenCodec, TokenError};
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use db::models::attendance_record::{self, ConfirmError};
use serde::Deserialize;
use util::state::AppState;

/// Either the scanned token, or the explicit triple an admin can key in when
/// the student's screen will not scan. The two paths converge on the same
/// validation; the token is a convenience, never a source of trust.
#[derive(Debug, Deserialize)]
pub struct ConfirmCheckinRequest {
    pub token: Option<String>,
    pub student_id: Option<i64>,
    pub round_id: Option<i64>,
    pub session_id: Option<i64>,
}

/// POST `/api/jobs/{job_id}/checkin/confirm` (admin only)
///
/// Verifies the presented claim and writes the attendance record. All domain
/// checks live in [`attendance_record::Model::confirm`]; this handler only
/// resolves the claim and maps refusals onto status codes.
pub async fn confirm_checkin(
    State(app_state): State<AppState>,
    Path(job_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<ConfirmCheckinRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let (student_id, round_id, session_id) = if let Some(token) = &req.token {
        match TokenCodec::from_config().verify(token, Utc::now()) {
            // A token minted for a different job is indistinguishable from a
            // forged one as far as this endpoint is concerned.
            Ok(c) if c.job_id != job_id => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(TokenError::Invalid.to_string())),
                );
            }
            Ok(c) => (c.student_id, c.round_id, c.session_id),
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
            }
        }
    } else {
        match (req.student_id, req.round_id, req.session_id) {
            (Some(student_id), Some(round_id), Some(session_id)) => {
                (student_id, round_id, session_id)
            }
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(
                        "Provide a token, or student_id, round_id and session_id",
                    )),
                );
            }
        }
    };

    match attendance_record::Model::confirm(
        app_state.db(),
        student_id,
        job_id,
        round_id,
        session_id,
        claims.sub,
    )
    .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(record.into(), "Attendance recorded")),
        ),
        Err(e @ ConfirmError::SessionNotActive) | Err(e @ ConfirmError::AlreadyRecorded) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ ConfirmError::ApplicationNotFound) => (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(ConfirmError::Db(e)) => {
            tracing::error!(error = %e, "attendance confirm failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Internal server error")),
            )
        }
    }
}
