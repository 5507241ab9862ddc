//! Shared harness for the HTTP integration tests: config bootstrap, an
//! in-memory app instance, seeded domain data, and request helpers.

use api::auth::generate_jwt;
use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::models::user::VerificationStatus;
use db::models::{application, job, round, round_session, user};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Once;
use tower::ServiceExt;
use util::state::AppState;

pub const TEST_CHECKIN_SECRET: &str = "integration-test-checkin-secret";

static INIT: Once = Once::new();

/// Populates the required environment before the config singleton first
/// loads. Every test entry point calls this through `make_test_app`.
fn init_config() {
    INIT.call_once(|| unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "integration-test-jwt-secret");
        std::env::set_var("CHECKIN_SECRET", TEST_CHECKIN_SECRET);
    });
}

/// Fresh app over a fresh in-memory database, routed exactly as in `main`.
pub async fn make_test_app() -> (Router, AppState) {
    init_config();
    let db = setup_test_db().await;
    let state = AppState::new(db);
    let app = Router::new().nest("/api", routes(state.clone()));
    (app, state)
}

pub fn bearer(user_id: i64, admin: bool) -> String {
    let (token, _) = generate_jwt(user_id, admin);
    format!("Bearer {token}")
}

/// The usual cast: an admin, an approved student with an active application
/// to one job, two rounds, and a live session on round 1.
pub struct Seed {
    pub admin: user::Model,
    pub student: user::Model,
    pub job: job::Model,
    pub round1: round::Model,
    pub round2: round::Model,
    pub session1: round_session::Model,
    pub application: application::Model,
}

pub async fn seed(db: &DatabaseConnection) -> Seed {
    let admin = user::Model::create(db, "admin", "admin@test.com", "adminpw", true)
        .await
        .unwrap();
    let student = user::Model::create(db, "u23000001", "student@test.com", "studentpw", false)
        .await
        .unwrap();
    let student = student
        .set_verification_status(db, VerificationStatus::Approved)
        .await
        .unwrap();

    let job = job::Model::create(db, "Acme Corp", "Graduate Engineer")
        .await
        .unwrap();
    let round1 = round::Model::create(db, job.id, "Screening", 1).await.unwrap();
    let round2 = round::Model::create(db, job.id, "Technical", 2).await.unwrap();
    let application = application::Model::create(db, student.id, job.id)
        .await
        .unwrap();
    let session1 = round_session::Model::open(db, round1.id, admin.id)
        .await
        .unwrap();

    Seed {
        admin,
        student,
        job,
        round1,
        round2,
        session1,
        application,
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Value,
    auth: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: Value,
    auth: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}
