//! Route definitions for Gatehouse.
//!
//! Auth endpoints are mounted at the root and again under `/api`. Anything
//! without a route falls through to the static document root. The request
//! gate wraps the whole router, fallback included.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let auth = auth_routes(state.config.auth.self_registration);

    let api_routes = Router::new()
        .merge(auth.clone())
        .route("/health", get(handlers::health::health));

    let mut router = Router::new()
        .merge(auth)
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&state.config.gate.document_root))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::request_gate,
        ));

    if state.config.server.cors.enabled {
        router = router.layer(middleware::cors::build_cors_layer(&state.config.server.cors));
    }

    router = router
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging));

    if state.config.gate.security_headers {
        for layer in middleware::security::security_header_layers(
            &state.config.gate.content_security_policy,
        ) {
            router = router.layer(layer);
        }
    }

    router.with_state(state)
}

/// Auth endpoints: login, logout, check, and register when enabled
fn auth_routes(self_registration: bool) -> Router<AppState> {
    let routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/auth/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route("/auth/check", get(handlers::auth::check));

    if self_registration {
        routes.route("/auth/register", post(handlers::auth::register))
    } else {
        routes
    }
}
