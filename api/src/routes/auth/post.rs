use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use axum::{Json, extract::State, http::StatusCode};
use db::models::user::{self, VerificationStatus};
use serde::{Deserialize, Serialize};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub verification_status: String,
    pub token: String,
    pub expires_at: String,
}

/// POST `/api/auth/login`
///
/// Verifies the credentials against the stored argon2 hash and answers with
/// a bearer token. Unknown users and wrong passwords get the same reply.
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    match user::Model::verify_credentials(app_state.db(), &req.username, &req.password).await {
        Ok(Some(user)) => {
            let (token, expires_at) = generate_jwt(user.id, user.admin);
            let body = LoginResponse {
                id: user.id,
                username: user.username,
                email: user.email,
                admin: user.admin,
                verification_status: verification_label(user.verification_status).to_owned(),
                token,
                expires_at,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(body, "Login successful")),
            )
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid username or password")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "login query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Internal server error")),
            )
        }
    }
}

fn verification_label(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Pending => "pending",
        VerificationStatus::Approved => "approved",
        VerificationStatus::Rejected => "rejected",
    }
}
