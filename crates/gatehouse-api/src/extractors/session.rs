//! `SessionCookie` extractor: the session token from the `Cookie` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::state::AppState;

/// Session token presented by the client, if any.
///
/// Never rejects: a missing or empty cookie yields `None`.
#[derive(Debug, Clone, Default)]
pub struct SessionCookie(pub Option<String>);

impl SessionCookie {
    /// Reads the cookie named `cookie_name` from `headers`.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let token = CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());
        Self(token)
    }

    /// The token as a string slice.
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(
            &parts.headers,
            &state.config.session.cookie_name,
        ))
    }
}
