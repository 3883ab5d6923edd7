//! Credential gate — authentication middleware for protected routes.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use mentor_auth::AuthError;
use mentor_core::{UserRecord, Username};

use crate::cookies::{extract_cookie, ACCESS_COOKIE};
use crate::error::ApiError;
use crate::routes::AppState;

/// The authenticated account, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Reject the request unless it carries a valid access token for an
/// existing account. Pure interception: verifies, resolves, attaches —
/// never mutates stored state.
///
/// Token sources, in order: the `token` cookie, then an
/// `Authorization: Bearer` header.
///
/// # Errors
/// Returns [`ApiError::Unauthenticated`] on a missing, expired, or invalid
/// token, and when the token's subject no longer exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = access_token_from(request.headers())
        .ok_or(ApiError::Unauthenticated { reason: "no token" })?;

    let claims = state
        .accounts
        .tokens()
        .verify_access(&token)
        .map_err(|e| match e {
            AuthError::TokenExpired => ApiError::Unauthenticated { reason: "expired" },
            _ => ApiError::Unauthenticated { reason: "invalid" },
        })?;

    let username = Username::new(claims.sub)
        .map_err(|_| ApiError::Unauthenticated { reason: "invalid" })?;
    let record = state
        .store
        .find(&username)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::Unauthenticated { reason: "unknown user" })?;

    request.extensions_mut().insert(CurrentUser(record));
    Ok(next.run(request).await)
}

/// The presented access token, if any.
#[must_use]
pub fn access_token_from(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, ACCESS_COOKIE).or_else(|| bearer_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_header_is_fallback_for_missing_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok123"));
        assert_eq!(access_token_from(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("token=from-cookie"),
        );
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(access_token_from(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn malformed_authorization_header_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(access_token_from(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(access_token_from(&headers).is_none());
    }
}
