//! Ephemeral execution of student-submitted code for the Mentor backend.
//!
//! Writes each submission to a uniquely named throwaway file, runs an
//! external interpreter over it with a wall-clock limit, captures the text
//! output, and guarantees the file is gone afterwards.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod runner;
pub mod script;

pub use config::{SandboxConfig, DEFAULT_TIMEOUT};
pub use error::SandboxError;
pub use runner::ScriptRunner;
pub use script::ScriptFile;
