//! Application builder: wires stores, auth, router, and listeners.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use gatehouse_auth::bootstrap::seed_default_accounts;
use gatehouse_auth::session::SessionCleanup;
use gatehouse_core::config::AppConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::SystemClock;
use gatehouse_entity::account::Account;
use gatehouse_entity::session::Session;
use gatehouse_store::JsonFileStore;

use crate::router::build_router;
use crate::server::redirect::run_redirect_listener;
use crate::server::tls::{ensure_certificate, load_acceptor, serve_tls};
use crate::server::wait_for_shutdown;
use crate::state::AppState;

/// Opens the JSON-backed stores and applies startup bootstrap.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let account_backend = Arc::new(JsonFileStore::<Account>::new(&config.storage.accounts_file));
    let session_backend = Arc::new(JsonFileStore::<Session>::new(&config.storage.sessions_file));

    let state = AppState::new(config, account_backend, session_backend, Arc::new(SystemClock)).await?;

    seed_default_accounts(
        &state.accounts,
        &state.config.bootstrap.accounts,
        state.default_role,
    )
    .await?;

    if state.config.session.reset_on_start {
        state.sessions.reset().await?;
    }

    Ok(state)
}

/// Runs Gatehouse until `shutdown` flips to `true`.
pub async fn run_server(config: AppConfig, shutdown: watch::Receiver<bool>) -> Result<(), AppError> {
    tracing::info!("Starting Gatehouse server...");

    // ── Step 1: Stores and bootstrap ─────────────────────────────
    let state = build_state(config).await?;
    let config = Arc::clone(&state.config);

    // ── Step 2: Session sweep ────────────────────────────────────
    let cleanup_handle = if config.session.cleanup_interval_seconds > 0 {
        let cleanup = SessionCleanup::new(
            Arc::clone(&state.sessions),
            Duration::from_secs(config.session.cleanup_interval_seconds),
        );
        Some(cleanup.spawn(shutdown.clone()))
    } else {
        None
    };

    // ── Step 3: Listeners ────────────────────────────────────────
    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    let result = if config.server.tls.enabled {
        let tls = &config.server.tls;
        ensure_certificate(tls).await?;
        let acceptor = load_acceptor(tls)?;

        let redirect_handle = (tls.redirect_port != 0).then(|| {
            let host = config.server.host.clone();
            let (port, tls_port) = (tls.redirect_port, config.server.port);
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                if let Err(e) = run_redirect_listener(&host, port, tls_port, shutdown).await {
                    tracing::error!(error = %e, "Redirect listener stopped");
                }
            })
        });

        tracing::info!("Gatehouse server listening on https://{}", addr);
        let result = serve_tls(listener, acceptor, app, shutdown).await;

        if let Some(handle) = redirect_handle {
            let _ = handle.await;
        }
        result
    } else {
        tracing::info!("Gatehouse server listening on http://{}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    };

    if let Some(handle) = cleanup_handle {
        let _ = handle.await;
    }

    tracing::info!("Gatehouse server stopped");
    result
}
