//! Core types for the Mentor tutoring backend.
//!
//! Defines the fundamental domain types shared by the auth, sandbox, and
//! gateway crates: usernames and the persisted account record.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod identity;

pub use error::CoreError;
pub use identity::{UserRecord, Username, MAX_USERNAME_LEN};
