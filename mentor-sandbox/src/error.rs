//! Error types for the sandbox crate.

use std::path::PathBuf;

/// Errors that can occur while preparing or running a script.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SandboxError {
    /// The submitted code was empty or all whitespace.
    #[error("no code provided")]
    EmptyCode,

    /// The interpreter process could not be started.
    #[error("failed to spawn {interpreter}: {source}")]
    Spawn {
        interpreter: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure before the interpreter ran (workdir creation,
    /// script write).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
