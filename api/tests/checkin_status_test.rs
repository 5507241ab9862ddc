//! End-to-end coverage of `GET /api/jobs/{job_id}/checkin/status`.

mod helpers;

use chrono::{Duration, Utc};
use db::models::attendance_record::{self, Outcome};
use db::models::round_session::Status;
use db::models::user::VerificationStatus;
use db::models::{application, round_session, user};
use axum::http::StatusCode;
use helpers::app::{bearer, get_json, make_test_app, seed};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

#[tokio::test]
async fn status_requires_authentication() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (status, body) = get_json(&app, &uri, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn unverified_student_is_rejected() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;
    s.student
        .set_verification_status(state.db(), VerificationStatus::Pending)
        .await
        .unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (status, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Verification required");
}

#[tokio::test]
async fn student_without_application_is_rejected() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;
    s.application.withdraw(state.db()).await.unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (status, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "No active application for this job");
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;

    let (status, body) =
        get_json(&app, "/api/jobs/999/checkin/status", Some(&bearer(s.student.id, false))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn live_first_round_carries_token_second_not_started() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (status, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    assert_eq!(status, StatusCode::OK);
    let rounds = body["data"]["rounds"].as_array().unwrap();
    assert_eq!(rounds.len(), 2);

    assert_eq!(rounds[0]["round_id"], s.round1.id);
    assert_eq!(rounds[0]["status"], "ACTIVE");
    let token = rounds[0]["token"].as_str().unwrap();

    // The issued token decodes under the configured secret and names this
    // student, job, round and session.
    let codec = api::checkin::TokenCodec::new(
        helpers::app::TEST_CHECKIN_SECRET.as_bytes().to_vec(),
        Duration::minutes(10),
    );
    let claims = codec.verify(token, Utc::now()).unwrap();
    assert_eq!(claims.student_id, s.student.id);
    assert_eq!(claims.job_id, s.job.id);
    assert_eq!(claims.round_id, s.round1.id);
    assert_eq!(claims.session_id, s.session1.id);

    // Round 2 has no session yet, so no token either.
    assert_eq!(rounds[1]["status"], "NOT_STARTED");
    assert!(rounds[1]["token"].is_null());
}

#[tokio::test]
async fn temporarily_closed_session_hides_token() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;
    s.session1
        .transition(state.db(), Status::TemporarilyClosed)
        .await
        .unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (_, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    let rounds = body["data"]["rounds"].as_array().unwrap();
    assert_eq!(rounds[0]["status"], "TEMP_CLOSED");
    assert!(rounds[0]["token"].is_null());
}

#[tokio::test]
async fn attended_first_round_unlocks_second() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let s = seed(db).await;

    attendance_record::Model::confirm(db, s.student.id, s.job.id, s.round1.id, s.session1.id, s.admin.id)
        .await
        .unwrap();
    s.session1
        .transition(db, Status::PermanentlyClosed)
        .await
        .unwrap();
    round_session::Model::open(db, s.round2.id, s.admin.id)
        .await
        .unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (_, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    let rounds = body["data"]["rounds"].as_array().unwrap();
    // An existing record wins over the session's closed state.
    assert_eq!(rounds[0]["status"], "ATTENDED_ATTENDED");
    assert_eq!(rounds[0]["outcome"], "ATTENDED");
    assert!(rounds[0]["token"].is_null());

    assert_eq!(rounds[1]["status"], "ACTIVE");
    assert!(rounds[1]["token"].is_string());
}

#[tokio::test]
async fn failed_first_round_blocks_second() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let s = seed(db).await;

    // A failed outcome is written by placement staff, not by this subsystem;
    // seed it directly.
    attendance_record::ActiveModel {
        student_id: Set(s.student.id),
        round_id: Set(s.round1.id),
        session_id: Set(s.session1.id),
        confirmed_by: Set(s.admin.id),
        outcome: Set(Outcome::Failed),
        recorded_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();

    s.session1
        .transition(db, Status::PermanentlyClosed)
        .await
        .unwrap();
    round_session::Model::open(db, s.round2.id, s.admin.id)
        .await
        .unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (_, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    let rounds = body["data"]["rounds"].as_array().unwrap();
    assert_eq!(rounds[0]["status"], "ATTENDED_FAILED");
    assert_eq!(rounds[0]["outcome"], "FAILED");
    assert_eq!(rounds[1]["status"], "NOT_ELIGIBLE");
    assert!(rounds[1]["token"].is_null());
}

#[tokio::test]
async fn each_issuance_mints_a_distinct_token() {
    let (app, state) = make_test_app().await;
    let s = seed(state.db()).await;
    let auth = bearer(s.student.id, false);

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (_, first) = get_json(&app, &uri, Some(&auth)).await;
    let (_, second) = get_json(&app, &uri, Some(&auth)).await;

    let a = first["data"]["rounds"][0]["token"].as_str().unwrap();
    let b = second["data"]["rounds"][0]["token"].as_str().unwrap();
    assert_ne!(a, b);
}

// Other students' records must never leak into a status view.
#[tokio::test]
async fn status_is_scoped_to_the_requesting_student() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let s = seed(db).await;

    let other = user::Model::create(db, "u23000002", "other@test.com", "pw", false)
        .await
        .unwrap();
    let other = other
        .set_verification_status(db, VerificationStatus::Approved)
        .await
        .unwrap();
    application::Model::create(db, other.id, s.job.id).await.unwrap();
    attendance_record::Model::confirm(db, other.id, s.job.id, s.round1.id, s.session1.id, s.admin.id)
        .await
        .unwrap();

    let uri = format!("/api/jobs/{}/checkin/status", s.job.id);
    let (_, body) = get_json(&app, &uri, Some(&bearer(s.student.id, false))).await;

    let rounds = body["data"]["rounds"].as_array().unwrap();
    assert_eq!(rounds[0]["status"], "ACTIVE");
}
