//! Request gate: protected paths require a live session.
//!
//! Auth endpoints always pass. A protected path without a valid session
//! cookie is answered with a `302` to the login page carrying the original
//! path in `redirect`. Everything else reaches the router untouched.
//!
//! Paths are classified in the form the static file service resolves them:
//! percent-decoded, with empty and `.` segments dropped. A request that
//! cannot be resolved that way (`..`, invalid UTF-8) is treated as
//! protected.

use std::collections::HashSet;

use axum::extract::{Request, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::debug;

use gatehouse_entity::account::UserRole;

use crate::extractors::SessionCookie;
use crate::state::AppState;

/// Characters left readable in the `redirect` query value.
const REDIRECT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Path prefixes of the auth endpoints.
const AUTH_PREFIXES: [&str; 2] = ["/auth/", "/api/auth/"];

/// File served for directory requests.
const DIRECTORY_INDEX: &str = "index.html";

/// Identity of the session that opened a protected path. Attached to the
/// response so the access log can name the user.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub username: String,
    pub role: UserRole,
}

/// Compiled protected-path rules.
///
/// An entry ending in `*` protects every path starting with the part
/// before it; any other entry protects exactly that path.
#[derive(Debug, Clone, Default)]
pub struct ProtectedPaths {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl ProtectedPaths {
    /// Compiles configured entries.
    pub fn new(entries: &[String]) -> Self {
        let mut paths = Self::default();
        for entry in entries {
            match entry.strip_suffix('*') {
                Some(prefix) => paths.prefixes.push(prefix.to_string()),
                None => {
                    paths.exact.insert(entry.clone());
                }
            }
        }
        paths
    }

    /// Whether `path` (canonical, without query) requires a session.
    pub fn is_protected(&self, path: &str) -> bool {
        self.exact.contains(path) || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Whether a request for `raw_path` reaches protected content, either
    /// directly or through the directory's index file.
    pub fn covers(&self, raw_path: &str) -> bool {
        let Some(path) = canonical_path(raw_path) else {
            return true;
        };
        if path == "/" {
            return self.is_protected("/") || self.is_protected(&format!("/{DIRECTORY_INDEX}"));
        }
        self.is_protected(&path)
            || self.is_protected(&format!("{path}/"))
            || self.is_protected(&format!("{path}/{DIRECTORY_INDEX}"))
    }
}

/// Decodes `raw` and drops empty and `.` segments, so `//a/./b/` becomes
/// `/a/b`. `None` for `..` or bytes that are not UTF-8.
pub fn canonical_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let mut canonical = String::with_capacity(decoded.len() + 1);
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            _ => {
                canonical.push('/');
                canonical.push_str(segment);
            }
        }
    }
    if canonical.is_empty() {
        canonical.push('/');
    }
    Some(canonical)
}

/// Whether `path` belongs to the auth endpoints.
pub fn is_auth_path(path: &str) -> bool {
    AUTH_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// `Location` value sending the client to the login page and back.
pub fn login_redirect_location(login_path: &str, original: &str) -> String {
    format!(
        "{login_path}?redirect={}",
        utf8_percent_encode(original, REDIRECT_VALUE)
    )
}

/// Gate middleware applied to the whole router, fallback included.
pub async fn request_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    // Only a literal auth path is routed to a handler; anything else falls
    // through to the static files.
    let routed_to_auth = is_auth_path(path) && canonical_path(path).as_deref() == Some(path);
    if routed_to_auth || !state.protected_paths.covers(path) {
        return next.run(request).await;
    }

    let cookie = SessionCookie::from_headers(request.headers(), &state.config.session.cookie_name);
    let session = match cookie.token() {
        Some(token) => state.sessions.resolve(token).await,
        None => None,
    };

    match session {
        Some(session) => {
            let identity = AuthenticatedSession {
                username: session.username,
                role: session.role,
            };
            let mut response = next.run(request).await;
            response.extensions_mut().insert(identity);
            response
        }
        None => {
            let original = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            debug!(path = %request.uri().path(), "Protected path without session");
            redirect_to_login(&state.config.gate.login_path, original)
        }
    }
}

fn redirect_to_login(login_path: &str, original: &str) -> Response {
    let location = login_redirect_location(login_path, original);
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(_) => StatusCode::UNAUTHORIZED.into_response(),
    }
}
