//! Plaintext listener that sends every request to the TLS port.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{HOST, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::watch;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;

use super::wait_for_shutdown;

/// Router answering every request with `301` to the same path on HTTPS.
pub fn redirect_router(tls_port: u16) -> Router {
    Router::new()
        .fallback(redirect_to_https)
        .with_state(tls_port)
}

/// `https://{host}:{tls_port}{path_and_query}` for the given `Host` header.
///
/// The port of the `Host` header is replaced; bracketed IPv6 literals are
/// kept whole. A missing host becomes `localhost`.
pub fn https_location(host: Option<&str>, tls_port: u16, path_and_query: &str) -> String {
    let host = host.map(strip_port).filter(|h| !h.is_empty()).unwrap_or("localhost");
    format!("https://{host}:{tls_port}{path_and_query}")
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

async fn redirect_to_https(State(tls_port): State<u16>, request: Request) -> Response {
    let host = request.headers().get(HOST).and_then(|h| h.to_str().ok());
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let location = https_location(host, tls_port, path_and_query);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Serves the redirect router on `host:port` until shutdown.
pub async fn run_redirect_listener(
    host: &str,
    port: u16,
    tls_port: u16,
    shutdown: watch::Receiver<bool>,
) -> AppResult<()> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, tls_port = tls_port, "HTTP redirect listener started");

    axum::serve(listener, redirect_router(tls_port))
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(|e| AppError::internal(format!("Redirect listener error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_replaces_port() {
        assert_eq!(
            https_location(Some("example.com:8080"), 8443, "/a?b=1"),
            "https://example.com:8443/a?b=1"
        );
        assert_eq!(
            https_location(Some("example.com"), 443, "/"),
            "https://example.com:443/"
        );
    }

    #[test]
    fn test_location_ipv6_and_missing_host() {
        assert_eq!(
            https_location(Some("[::1]:8080"), 8443, "/x"),
            "https://[::1]:8443/x"
        );
        assert_eq!(https_location(None, 8443, "/"), "https://localhost:8443/");
        assert_eq!(https_location(Some(""), 8443, "/"), "https://localhost:8443/");
    }
}
