//! Sandbox invocation configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default wall-clock limit per execution: 10 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed invocation options for the external interpreter.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SandboxConfig {
    /// Interpreter binary, resolved via `$PATH` if not absolute.
    pub interpreter: PathBuf,

    /// Arguments placed before the script path. `-u` forces unbuffered
    /// text-mode output.
    pub interpreter_args: Vec<String>,

    /// Working directory shared by all executions; each run gets its own
    /// uniquely named script file inside it.
    pub workdir: PathBuf,

    /// Wall-clock limit; the interpreter is killed when it elapses.
    pub timeout: Duration,
}

impl SandboxConfig {
    /// Python defaults: `python3 -u`, shared `/tmp` workdir, 10 s limit.
    #[must_use]
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            interpreter: PathBuf::from("python3"),
            interpreter_args: vec!["-u".to_owned()],
            workdir,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the interpreter and its leading arguments.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: PathBuf, args: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self.interpreter_args = args;
        self
    }

    /// Override the wall-clock limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
