//! Security response headers.

use axum::http::HeaderValue;
use axum::http::header::{
    CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
    X_XSS_PROTECTION,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// Builds the header layers set on every response.
///
/// An invalid policy string falls back to `default-src 'self'`.
pub fn security_header_layers(content_security_policy: &str) -> Vec<SetResponseHeaderLayer<HeaderValue>> {
    let csp = HeaderValue::from_str(content_security_policy).unwrap_or_else(|_| {
        tracing::warn!("Invalid Content-Security-Policy, using default-src 'self'");
        HeaderValue::from_static("default-src 'self'")
    });

    vec![
        SetResponseHeaderLayer::overriding(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        SetResponseHeaderLayer::overriding(X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        SetResponseHeaderLayer::overriding(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        SetResponseHeaderLayer::overriding(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ),
        SetResponseHeaderLayer::overriding(CONTENT_SECURITY_POLICY, csp),
    ]
}
