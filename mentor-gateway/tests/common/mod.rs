//! Shared scaffolding for gateway integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::SET_COOKIE;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use mentor_auth::{AccountService, ApiKeyManager, MemoryStore, TokenService};
use mentor_gateway::genai::{GenAiError, GenerativeModel};
use mentor_gateway::routes::{create_router, AppState};
use mentor_sandbox::{SandboxConfig, ScriptRunner};

/// Fake backend that echoes which key and prompt it was called with.
pub struct EchoModel;

#[async_trait::async_trait]
impl GenerativeModel for EchoModel {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GenAiError> {
        Ok(format!("key={api_key} prompt_len={}", prompt.len()))
    }
}

/// A router over fresh in-memory services plus the sandbox scratch dir.
///
/// The runner is backed by `sh` so the tests do not depend on a Python
/// install; submitted "code" is shell.
pub fn test_backend(
    default_key: Option<String>,
    allow_fallback: bool,
    rotate_refresh: bool,
) -> (Router, tempfile::TempDir) {
    let dir = match tempfile::tempdir() {
        Ok(d) => d,
        Err(e) => panic!("tempdir failed: {e}"),
    };
    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new("test-access-secret", "test-refresh-secret");
    let state = AppState {
        accounts: Arc::new(AccountService::new(store.clone(), tokens, rotate_refresh)),
        store: store.clone(),
        api_keys: Arc::new(ApiKeyManager::new(store, default_key, allow_fallback)),
        runner: Arc::new(ScriptRunner::new(
            SandboxConfig::new(dir.path().to_path_buf())
                .with_interpreter(PathBuf::from("sh"), vec![])
                .with_timeout(Duration::from_secs(5)),
        )),
        model: Arc::new(EchoModel),
    };
    (create_router(state), dir)
}

/// POST a JSON body, with optional Cookie and Authorization headers.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
    bearer: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("cookie", c);
    }
    if let Some(t) = bearer {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(json) => {
            match builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
            {
                Ok(r) => r,
                Err(e) => panic!("failed to build request: {e}"),
            }
        }
        None => match builder.body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        },
    };
    match app.clone().oneshot(req).await {
        Ok(r) => r,
        Err(e) => panic!("handler error: {e}"),
    }
}

/// Parse the response body as JSON.
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = match axum::body::to_bytes(resp.into_body(), 256 * 1024).await {
        Ok(b) => b,
        Err(e) => panic!("failed to read body: {e}"),
    };
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("invalid JSON body: {e}"),
    }
}

/// Value of the named cookie from the response's Set-Cookie headers.
pub fn cookie_value(resp: &Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|set_cookie| {
            let rest = set_cookie.strip_prefix(&prefix)?;
            let value = rest.split(';').next().unwrap_or(rest);
            if value.is_empty() {
                None
            } else {
                Some(value.to_owned())
            }
        })
}

/// Register an account and log in; returns (access, refresh) tokens.
pub async fn signup_and_login(app: &Router, username: &str, password: &str) -> (String, String) {
    let resp = request(
        app,
        "POST",
        "/signup",
        Some(serde_json::json!({"username": username, "password": password})),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), 201, "signup must succeed");

    let resp = request(
        app,
        "POST",
        "/login",
        Some(serde_json::json!({"username": username, "password": password})),
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), 200, "login must succeed");
    let access = match cookie_value(&resp, "token") {
        Some(t) => t,
        None => panic!("login must set the access cookie"),
    };
    let refresh = match cookie_value(&resp, "refreshToken") {
        Some(t) => t,
        None => panic!("login must set the refresh cookie"),
    };
    (access, refresh)
}
