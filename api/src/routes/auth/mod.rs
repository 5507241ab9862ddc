use axum::{Router, routing::post};
use util::state::AppState;

mod post;

pub use post::login;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
