//! Fuzz target: JSON deserialization of the execute/chat request bodies.
//!
//! Verifies that arbitrary byte sequences fed to the JSON parser never
//! cause panics, UB, or unbounded resource consumption.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mentor_gateway::routes::{ChatBody, ExecuteBody};

fuzz_target!(|data: &[u8]| {
    // Errors are expected and fine; panics are not.
    let _ = serde_json::from_slice::<ExecuteBody>(data);
    let _ = serde_json::from_slice::<ChatBody>(data);
});
