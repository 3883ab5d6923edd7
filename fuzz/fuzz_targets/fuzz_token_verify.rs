//! Fuzz target: token verification on arbitrary input.
//!
//! Tokens arrive straight from cookies and headers; verification must
//! reject garbage with an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mentor_auth::TokenService;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let service = TokenService::new("fuzz-access-secret", "fuzz-refresh-secret");
    let _ = service.verify_access(token);
    let _ = service.verify_refresh(token);
});
