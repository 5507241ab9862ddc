use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs every request with method, path, response status and latency.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );

    response
}
