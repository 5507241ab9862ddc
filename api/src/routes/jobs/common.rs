//! Wire labels and response helpers shared by the check-in and round routes.

use crate::response::ApiResponse;
use axum::{Json, http::StatusCode};
use db::models::attendance_record::Outcome;
use db::models::round_session::Status;
use sea_orm::DbErr;
use serde::Serialize;

/// Stable wire label for a round's live session state. `None` is the
/// no-session-yet case.
pub fn session_status_label(status: Option<Status>) -> &'static str {
    match status {
        None => "NOT_STARTED",
        Some(Status::Active) => "ACTIVE",
        Some(Status::TemporarilyClosed) => "TEMP_CLOSED",
        Some(Status::PermanentlyClosed) => "PERM_CLOSED",
    }
}

pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Attended => "ATTENDED",
        Outcome::Failed => "FAILED",
    }
}

/// Logs the error and answers with an opaque 500. Database details never
/// reach the client.
pub fn db_failure<T>(e: DbErr) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    tracing::error!(error = %e, "database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error("Internal server error")),
    )
}
