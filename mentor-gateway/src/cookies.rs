//! Cookie formatting and extraction over raw HTTP headers.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "token";

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Format a session cookie: HTTP-only, secure, lifetime matching the token.
#[must_use]
pub fn session_cookie(name: &str, value: &str, max_age_seconds: u64) -> String {
    format!("{name}={value}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_seconds}")
}

/// Format an expired cookie that clears `name` on the client.
#[must_use]
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}

/// Extract a named cookie's value from the request headers.
#[must_use]
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let mut pieces = part.trim().splitn(2, '=');
        let key = pieces.next()?.trim();
        let value = pieces.next()?.trim();
        if key == cookie_name && !value.is_empty() {
            return Some(value.to_owned());
        }
    }
    None
}
