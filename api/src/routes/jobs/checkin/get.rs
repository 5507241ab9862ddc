use super::super::common::{db_failure, outcome_label, session_status_label};
use super::common::{CheckinStatusResponse, RoundStatusEntry};
use crate::auth::claims::AuthUser;
use crate::checkin::{TokenCodec, is_eligible};
use crate::response::ApiResponse;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use db::models::user::VerificationStatus;
use db::models::{application, attendance_record, job, round, round_session, user};
use sea_orm::EntityTrait;
use util::state::AppState;

/// GET `/api/jobs/{job_id}/checkin/status`
///
/// The student's per-round view of a job's check-in pipeline. A fresh token
/// is minted for every round whose latest session is live and for which the
/// student is eligible; everything else gets a status label and no token.
///
/// Precedence per round: an existing attendance record wins over session
/// state, and eligibility is only consulted while the session is live.
pub async fn checkin_status(
    State(app_state): State<AppState>,
    Path(job_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<CheckinStatusResponse>>) {
    let db = app_state.db();

    let student = match user::Entity::find_by_id(claims.sub).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            );
        }
        Err(e) => return db_failure(e),
    };
    if student.verification_status != VerificationStatus::Approved {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Verification required")),
        );
    }

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

    match application::Model::find_active(db, student.id, job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("No active application for this job")),
            );
        }
        Err(e) => return db_failure(e),
    }

    let rounds = match round::Model::active_for_job(db, job_id).await {
        Ok(rounds) => rounds,
        Err(e) => return db_failure(e),
    };
    let round_ids: Vec<i64> = rounds.iter().map(|r| r.id).collect();
    let attendance = match attendance_record::Model::map_for_student(db, student.id, &round_ids)
        .await
    {
        Ok(map) => map,
        Err(e) => return db_failure(e),
    };

    let codec = TokenCodec::from_config();
    let now = Utc::now();

    let mut entries = Vec::with_capacity(rounds.len());
    for r in &rounds {
        let (status, token, outcome) = if let Some(rec) = attendance.get(&r.id) {
            let label = outcome_label(rec.outcome);
            (format!("ATTENDED_{label}"), None, Some(label.to_owned()))
        } else {
            let latest = match round_session::Model::latest_for_round(db, r.id).await {
                Ok(latest) => latest,
                Err(e) => return db_failure(e),
            };
            match latest {
                Some(session) if session.status == round_session::Status::Active => {
                    if is_eligible(r.position, &rounds, &attendance) {
                        let token = codec.issue(student.id, job_id, r.id, session.id, now);
                        ("ACTIVE".to_owned(), Some(token), None)
                    } else {
                        ("NOT_ELIGIBLE".to_owned(), None, None)
                    }
                }
                other => (
                    session_status_label(other.map(|s| s.status)).to_owned(),
                    None,
                    None,
                ),
            }
        };

        entries.push(RoundStatusEntry {
            round_id: r.id,
            name: r.name.clone(),
            position: r.position,
            status,
            token,
            outcome,
        });
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            CheckinStatusResponse {
                job_id,
                rounds: entries,
            },
            "Check-in status retrieved",
        )),
    )
}
