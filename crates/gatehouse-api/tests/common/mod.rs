//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use gatehouse_api::{AppState, build_router};
use gatehouse_core::config::AppConfig;
use gatehouse_core::traits::ManualClock;
use gatehouse_entity::account::{Account, AccountProfile, UserRole};
use gatehouse_entity::session::Session;
use gatehouse_store::MemoryStore;

/// Test application backed by in-memory documents and a temporary
/// document root.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// Account document
    pub account_backend: Arc<MemoryStore<Account>>,
    /// Session document
    pub session_backend: Arc<MemoryStore<Session>>,
    /// Clock used for session expiry
    pub clock: Arc<ManualClock>,
    _document_root: TempDir,
}

impl TestApp {
    /// Create a test application with the default test configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application, letting the caller adjust the config.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let document_root = tempfile::tempdir().expect("Failed to create document root");
        std::fs::write(document_root.path().join("login.html"), "<h1>Login</h1>").unwrap();
        std::fs::write(document_root.path().join("dashboard.html"), "<h1>Dashboard</h1>").unwrap();
        std::fs::create_dir_all(document_root.path().join("app")).unwrap();
        std::fs::write(document_root.path().join("app/report.html"), "<h1>Report</h1>").unwrap();
        std::fs::create_dir_all(document_root.path().join("vault")).unwrap();
        std::fs::write(document_root.path().join("vault/index.html"), "<h1>Vault</h1>").unwrap();

        let mut config = AppConfig::default();
        config.gate.document_root = document_root.path().display().to_string();
        config.gate.protected_paths = vec![
            "/dashboard.html".to_string(),
            "/app/*".to_string(),
            "/vault/index.html".to_string(),
        ];
        adjust(&mut config);

        let account_backend: Arc<MemoryStore<Account>> = Arc::new(MemoryStore::new());
        let session_backend: Arc<MemoryStore<Session>> = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());

        let state = AppState::new(
            config,
            account_backend.clone(),
            session_backend.clone(),
            clock.clone(),
        )
        .await
        .expect("Failed to build state");

        Self {
            router: build_router(state.clone()),
            state,
            account_backend,
            session_backend,
            clock,
            _document_root: document_root,
        }
    }

    /// Create an account directly in the account table.
    pub async fn create_user(&self, username: &str, password: &str, role: UserRole) {
        self.state
            .accounts
            .create_account(username, password, role, AccountProfile::default())
            .await
            .expect("Failed to create test user");
    }

    /// Send a request with an optional form body and session cookie.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        form: Option<&str>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if form.is_some() {
            req = req.header("Content-Type", "application/x-www-form-urlencoded");
        }
        if let Some(token) = session {
            req = req.header(COOKIE, format!("session_id={token}"));
        }

        let req = req
            .body(Body::from(form.unwrap_or_default().to_string()))
            .expect("Failed to build request");

        send(&self.router, req).await
    }

    /// Log in and return the issued session token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/auth/login",
                Some(&format!("username={username}&password={password}")),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.session_cookie().expect("login did not set a cookie")
    }
}

/// Drive `router` with a single request.
pub async fn send(router: &Router, req: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let text = String::from_utf8_lossy(&body_bytes).to_string();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
        text,
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body
    pub text: String,
}

impl TestResponse {
    /// Raw `Set-Cookie` value, if any.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    /// Session token carried by `Set-Cookie`, if non-empty.
    pub fn session_cookie(&self) -> Option<String> {
        let value = self.set_cookie()?.strip_prefix("session_id=")?;
        let token = value.split(';').next().unwrap_or_default();
        (!token.is_empty()).then(|| token.to_string())
    }

    /// `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
