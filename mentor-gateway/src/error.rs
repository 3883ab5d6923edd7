//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use mentor_auth::AuthError;
use mentor_sandbox::SandboxError;

use crate::genai::GenAiError;

/// Errors that can occur during gateway request handling.
///
/// The `IntoResponse` impl is the only place internal detail turns into a
/// wire body: authentication failures and internal failures are logged with
/// their cause but answered with generic text.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request failed authentication. `reason` is logged, not sent.
    #[error("unauthenticated: {reason}")]
    Unauthenticated { reason: &'static str },

    /// The request body is missing or has an invalid required field.
    #[error("{0}")]
    BadRequest(String),

    /// Signup attempted with an existing username.
    #[error("{0}")]
    Conflict(String),

    /// No generative-model API key could be resolved for this request.
    #[error("no API key available; provide one or configure a default")]
    NoApiKey,

    /// The generative backend call failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Unexpected store/process failure. Detail is logged, never sent.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthenticated { reason } => {
                tracing::warn!(reason, "request rejected by credential gate");
                (StatusCode::UNAUTHORIZED, "unauthenticated".to_owned())
            }
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            err @ ApiError::NoApiKey => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Upstream(detail) => {
                tracing::error!(detail = %detail, "generative backend call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to get response".to_owned())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
            }
        };
        (status, Json(json!({"error": body}))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::BadRequest(err.to_string()),
            AuthError::TokenExpired => ApiError::Unauthenticated { reason: "expired" },
            AuthError::InvalidToken => ApiError::Unauthenticated { reason: "invalid" },
            AuthError::UnknownUser(_) => ApiError::Unauthenticated { reason: "unknown user" },
            AuthError::UsernameTaken(_) => ApiError::Conflict(err.to_string()),
            AuthError::NoApiKey => ApiError::NoApiKey,
            AuthError::EmptyApiKey => ApiError::BadRequest(err.to_string()),
            AuthError::Hash(detail) | AuthError::Store(detail) => ApiError::Internal(detail),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SandboxError> for ApiError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::EmptyCode => ApiError::BadRequest(err.to_string()),
            SandboxError::Spawn { .. } | SandboxError::Io(_) => {
                ApiError::Internal(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<GenAiError> for ApiError {
    fn from(err: GenAiError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}
