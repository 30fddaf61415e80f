//! Auth handlers: login, register, logout, check.
//!
//! Mounted under both `/auth` and `/api/auth`.

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};

use gatehouse_entity::account::UserRole;
use gatehouse_entity::permission::Permission;

use crate::cookie::{clear_session_cookie, session_cookie};
use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{CheckResponse, LoginResponse, MessageResponse, UserProfile};
use crate::error::ApiError;
use crate::extractors::SessionCookie;
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let req = form.map(|Form(req)| req).unwrap_or_default();

    let result = state
        .session_manager
        .login(&req.username, &req.password)
        .await?;

    let cookie = session_cookie(
        &state.config.session.cookie_name,
        result.token.as_str(),
        state.session_manager.ttl(),
        state.config.session.same_site_strict,
    );

    let body = LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        username: result.account.username.clone(),
        user: profile(
            &result.account.username,
            result.account.display_name(),
            result.account.role,
            &result.permissions,
        ),
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterRequest>, FormRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = form.map(|Form(req)| req).unwrap_or_default();

    let email = Some(req.email.as_str());
    state
        .registration
        .register(&req.username, &req.password, email)
        .await?;

    Ok(Json(MessageResponse::ok("Registration successful")))
}

/// GET|POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    cookie: SessionCookie,
) -> Result<Response, ApiError> {
    state.session_manager.logout(cookie.token()).await?;

    let cleared = clear_session_cookie(&state.config.session.cookie_name);
    Ok((
        [(SET_COOKIE, cleared)],
        Json(MessageResponse::ok("Logged out")),
    )
        .into_response())
}

/// GET /auth/check
pub async fn check(State(state): State<AppState>, cookie: SessionCookie) -> Json<CheckResponse> {
    let Some(active) = state.session_manager.check(cookie.token()).await else {
        return Json(CheckResponse::anonymous());
    };

    let user = profile(
        &active.session.username,
        &active.display_name,
        active.session.role,
        &active.permissions,
    );

    Json(CheckResponse {
        authenticated: true,
        username: Some(user.id.clone()),
        role: Some(user.role.clone()),
        permissions: Some(user.permissions.clone()),
        user: Some(user),
    })
}

fn profile(username: &str, name: &str, role: UserRole, permissions: &[Permission]) -> UserProfile {
    UserProfile {
        id: username.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        permissions: permissions.iter().map(|p| p.as_str().to_string()).collect(),
    }
}
