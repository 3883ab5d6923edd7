//! HTTP gateway for the Mentor tutoring backend.
//!
//! Exposes account, token, API-key, code-execution, and chat endpoints, and
//! guards the protected ones behind the credential gate.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod cookies;
pub mod error;
pub mod gate;
pub mod genai;
pub mod prompt;
pub mod routes;
