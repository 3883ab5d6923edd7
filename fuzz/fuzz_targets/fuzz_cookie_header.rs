//! Fuzz target: cookie-header parsing.
//!
//! The credential gate reads attacker-controlled Cookie headers; parsing
//! must never panic regardless of their shape.

#![no_main]

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use libfuzzer_sys::fuzz_target;
use mentor_gateway::cookies::extract_cookie;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = HeaderValue::from_bytes(data) else {
        return;
    };
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, value);
    let _ = extract_cookie(&headers, "token");
    let _ = extract_cookie(&headers, "refreshToken");
});
