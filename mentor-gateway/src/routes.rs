//! Axum route handlers for the Mentor gateway API.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use mentor_auth::{AccountService, ApiKeyManager, AuthError, CredentialStore};
use mentor_core::Username;
use mentor_sandbox::ScriptRunner;

use crate::cookies::{clear_cookie, extract_cookie, session_cookie, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::ApiError;
use crate::gate::{access_token_from, require_auth, CurrentUser};
use crate::genai::GenerativeModel;
use crate::prompt::build_prompt;

// ── Shared state ─────────────────────────────────────────────────────────────

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Signup/login/refresh/logout flows.
    pub accounts: Arc<AccountService>,
    /// Account lookups for the credential gate and login echo.
    pub store: Arc<dyn CredentialStore>,
    /// Per-user generative-model keys.
    pub api_keys: Arc<ApiKeyManager>,
    /// Ephemeral code execution.
    pub runner: Arc<ScriptRunner>,
    /// Generative backend.
    pub model: Arc<dyn GenerativeModel>,
}

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Body of `/refresh-token` and `/token` responses.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    /// Present only when rotation-on-refresh minted a new refresh token.
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "lessonId")]
    pub lesson_id: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct SetApiKeyBody {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given services.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/token", get(current_token))
        .route("/chat", post(chat))
        .route("/set_apikey", post(set_apikey))
        .route("/delete_apikey", delete(delete_apikey))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh))
        .route("/logout", post(logout))
        .route("/execute", post(execute))
        .merge(protected)
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `POST /signup` — register a new account.
///
/// # Errors
/// Returns [`ApiError::BadRequest`] for missing/invalid fields and
/// [`ApiError::Conflict`] for a duplicate username.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let username = parse_username(required(body.username, "username")?)?;
    let password = required(body.password, "password")?;

    state.accounts.signup(username.clone(), &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "account created".to_owned(),
            user: username.to_string(),
        }),
    ))
}

/// `POST /login` — authenticate and mint the token pair.
///
/// On success both tokens travel as HTTP-only cookies and in the body, and
/// the refresh token becomes the account's new refresh secret.
///
/// # Errors
/// Returns [`ApiError::BadRequest`] with one fixed message for every
/// credential failure — unknown users and wrong passwords are
/// indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Response, ApiError> {
    let username = Username::new(body.username.unwrap_or_default())
        .map_err(|_| AuthError::InvalidCredentials)?;
    let password = body.password.unwrap_or_default();

    let tokens = state.accounts.login(&username, &password).await?;
    let api_key = state
        .store
        .find(&username)
        .await?
        .and_then(|record| record.api_key);

    let tokens_svc = state.accounts.tokens();
    let mut response = (
        StatusCode::OK,
        Json(LoginResponse {
            message: "login successful".to_owned(),
            token: tokens.access.clone(),
            refresh_token: tokens.refresh.clone(),
            api_key,
        }),
    )
        .into_response();
    append_cookie(
        &mut response,
        &session_cookie(ACCESS_COOKIE, &tokens.access, tokens_svc.access_ttl().as_secs()),
    )?;
    append_cookie(
        &mut response,
        &session_cookie(REFRESH_COOKIE, &tokens.refresh, tokens_svc.refresh_ttl().as_secs()),
    )?;
    Ok(response)
}

/// `POST /refresh-token` — exchange the refresh cookie for a new access
/// token (and, with rotation enabled, a new refresh token).
///
/// # Errors
/// Returns [`ApiError::Unauthenticated`] when the cookie is absent, the
/// token fails verification, or it does not match the stored refresh secret.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let presented = extract_cookie(&headers, REFRESH_COOKIE)
        .ok_or(ApiError::Unauthenticated { reason: "no token" })?;

    let outcome = state.accounts.refresh(&presented).await?;

    let tokens_svc = state.accounts.tokens();
    let mut response = (
        StatusCode::OK,
        Json(TokenResponse {
            token: outcome.access.clone(),
            refresh_token: outcome.refresh.clone(),
        }),
    )
        .into_response();
    append_cookie(
        &mut response,
        &session_cookie(ACCESS_COOKIE, &outcome.access, tokens_svc.access_ttl().as_secs()),
    )?;
    if let Some(next) = &outcome.refresh {
        append_cookie(
            &mut response,
            &session_cookie(REFRESH_COOKIE, next, tokens_svc.refresh_ttl().as_secs()),
        )?;
    }
    Ok(response)
}

/// `GET /token` — echo the presented access token.
///
/// # Errors
/// Unreachable past the credential gate; kept for direct handler use.
pub async fn current_token(headers: HeaderMap) -> Result<Json<TokenResponse>, ApiError> {
    let token = access_token_from(&headers)
        .ok_or(ApiError::Unauthenticated { reason: "no token" })?;
    Ok(Json(TokenResponse { token, refresh_token: None }))
}

/// `POST /logout` — clear the session cookies.
///
/// When the request carries a valid access token, the stored refresh secret
/// is revoked too; an anonymous logout still succeeds and only clears
/// cookies.
///
/// # Errors
/// Returns [`ApiError::Internal`] only if a cookie header cannot be built.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(username) = identified_caller(&state, &headers) {
        if let Err(e) = state.accounts.logout(&username).await {
            tracing::warn!(username = %username, error = %e, "logout revocation skipped");
        }
    }

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse { message: "logged out".to_owned() }),
    )
        .into_response();
    append_cookie(&mut response, &clear_cookie(ACCESS_COOKIE))?;
    append_cookie(&mut response, &clear_cookie(REFRESH_COOKIE))?;
    Ok(response)
}

/// `POST /execute` — run submitted code and return its text output.
///
/// Script failures are not errors: the interpreter's error text comes back
/// as `output` with status 200, which is the tutoring feedback.
///
/// # Errors
/// Returns [`ApiError::BadRequest`] when `code` is missing or blank and
/// [`ApiError::Internal`] when the sandbox fails before the interpreter ran.
pub async fn execute(
    State(state): State<AppState>,
    Json(body): Json<ExecuteBody>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let code = body
        .code
        .ok_or_else(|| ApiError::BadRequest("no code provided".to_owned()))?;
    let output = state.runner.run(&code).await?;
    Ok(Json(ExecuteResponse { output }))
}

/// `POST /chat` — tutor reply for the student's message.
///
/// # Errors
/// Returns [`ApiError::BadRequest`] when `message` is missing,
/// [`ApiError::NoApiKey`] when no key resolves, and
/// [`ApiError::Upstream`] when the backend call fails.
pub async fn chat(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("no message provided".to_owned()))?;

    let api_key = state.api_keys.resolve(Some(&user))?;
    let prompt = build_prompt(
        &message,
        body.code.as_deref(),
        body.lesson_id.as_deref(),
        body.context.as_deref(),
    );
    let response = state.model.generate(&api_key, &prompt).await?;
    Ok(Json(ChatResponse { response }))
}

/// `POST /set_apikey` — store the caller's generative-model key.
///
/// # Errors
/// Returns [`ApiError::BadRequest`] when the key is missing or blank.
pub async fn set_apikey(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<SetApiKeyBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = body
        .api_key
        .ok_or_else(|| ApiError::BadRequest("API key is not provided".to_owned()))?;
    state.api_keys.set(&user.username, &key).await?;
    Ok(Json(MessageResponse { message: "API key has been set".to_owned() }))
}

/// `DELETE /delete_apikey` — clear the caller's key. Idempotent.
///
/// # Errors
/// Returns [`ApiError::Internal`] only on store failure.
pub async fn delete_apikey(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.api_keys.clear(&user.username).await?;
    Ok(Json(MessageResponse { message: "API key has been reset".to_owned() }))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
}

fn parse_username(raw: String) -> Result<Username, ApiError> {
    Username::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Username of a caller presenting a valid access token, if any.
fn identified_caller(state: &AppState, headers: &HeaderMap) -> Option<Username> {
    let token = access_token_from(headers)?;
    let claims = state.accounts.tokens().verify_access(&token).ok()?;
    Username::new(claims.sub).ok()
}

fn append_cookie(response: &mut Response, cookie: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::Internal(format!("unrepresentable cookie header: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
