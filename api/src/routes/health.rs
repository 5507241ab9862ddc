use crate::response::ApiResponse;
use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::{Value, json};
use util::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET `/api/health`
async fn health() -> (StatusCode, Json<ApiResponse<Value>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "status": "ok" }), "Healthy")),
    )
}
