//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use super::gate::AuthenticatedSession;

/// Logs request method, path, status, duration, and the user who opened a
/// protected path.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let user = response
        .extensions()
        .get::<AuthenticatedSession>()
        .map(|identity| identity.username.as_str());

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        user,
        "HTTP request"
    );

    response
}
