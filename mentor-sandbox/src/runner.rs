//! Script execution runner — runs student code in a disposable process.
//!
//! Each run writes the code to its own ephemeral file, spawns the
//! interpreter against it with fixed options, and captures text output.
//! A script that fails is not an error: its stderr becomes the output, so
//! the caller can show the traceback back to the student. Only failures
//! before the interpreter runs (write, spawn) surface as errors.

use std::process::ExitStatus;
use std::time::Instant;

use tokio::process::Command;

use crate::script::ScriptFile;
use crate::{SandboxConfig, SandboxError};

/// Executes submitted code in one external interpreter process per call.
///
/// Concurrent runs share the workdir and are isolated by unique script
/// names; there is no pooling or concurrency cap.
pub struct ScriptRunner {
    config: SandboxConfig,
}

impl ScriptRunner {
    /// Create a runner with the given invocation options.
    #[must_use]
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Create the shared workdir. Called once at process start; creating an
    /// existing directory is fine, any other failure is fatal to startup.
    ///
    /// # Errors
    /// Returns [`SandboxError::Io`] if the directory cannot be created.
    pub async fn init_workdir(&self) -> Result<(), SandboxError> {
        tokio::fs::create_dir_all(&self.config.workdir).await?;
        Ok(())
    }

    /// Run `code` and return its text output.
    ///
    /// Output is the process's stdout on exit 0, its stderr (the error
    /// text) on non-zero exit, or a timeout notice if the wall-clock limit
    /// elapsed. The ephemeral script file is removed on every path.
    ///
    /// # Errors
    /// Returns [`SandboxError::EmptyCode`] for blank input,
    /// [`SandboxError::Io`] if the script cannot be written,
    /// [`SandboxError::Spawn`] if the interpreter cannot be started.
    pub async fn run(&self, code: &str) -> Result<String, SandboxError> {
        if code.trim().is_empty() {
            return Err(SandboxError::EmptyCode);
        }

        let script = ScriptFile::create(&self.config.workdir, code).await?;
        let started = Instant::now();
        tracing::info!(script = %script.path().display(), "running submitted code");

        let result = self.spawn_and_capture(&script).await;

        script.remove().await;

        let output = result?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis(),
            output_len = output.len(),
            "execution finished"
        );
        Ok(output)
    }

    async fn spawn_and_capture(&self, script: &ScriptFile) -> Result<String, SandboxError> {
        let mut command = Command::new(&self.config.interpreter);
        command
            .args(&self.config.interpreter_args)
            .arg(script.path())
            .current_dir(&self.config.workdir)
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child via
        // kill_on_drop, so a runaway script cannot outlive its request.
        let output = match tokio::time::timeout(self.config.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SandboxError::Spawn {
                    interpreter: self.config.interpreter.clone(),
                    source: e,
                })
            }
            Err(_) => {
                tracing::warn!(
                    limit_secs = self.config.timeout.as_secs(),
                    "execution hit wall-clock limit, interpreter killed"
                );
                return Ok(format!(
                    "execution timed out after {}s",
                    self.config.timeout.as_secs()
                ));
            }
        };

        if output.status.success() {
            Ok(text_of(&output.stdout))
        } else {
            Ok(error_text(&output))
        }
    }
}

/// Lossy text with at most one trailing newline stripped.
fn text_of(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_suffix('\n').unwrap_or(&text).to_owned()
}

/// The output shown for a failed script: stderr, falling back to stdout,
/// falling back to the exit status.
fn error_text(output: &std::process::Output) -> String {
    let stderr = text_of(&output.stderr);
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = text_of(&output.stdout);
    if !stdout.is_empty() {
        return stdout;
    }
    exit_message(output.status)
}

fn exit_message(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("process exited with code {code}"),
        None => "process terminated by signal".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    /// Runner backed by `sh` so the tests do not depend on a Python install.
    fn sh_runner(workdir: PathBuf) -> ScriptRunner {
        ScriptRunner::new(
            SandboxConfig::new(workdir)
                .with_interpreter(PathBuf::from("sh"), vec![])
                .with_timeout(Duration::from_secs(5)),
        )
    }

    fn scratch() -> tempfile::TempDir {
        match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        }
    }

    fn remaining_scripts(dir: &std::path::Path) -> Vec<PathBuf> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("script_"))
                })
                .collect(),
            Err(e) => panic!("read_dir failed: {e}"),
        }
    }

    #[tokio::test]
    async fn empty_code_is_rejected_without_touching_disk() {
        let dir = scratch();
        let runner = sh_runner(dir.path().to_path_buf());
        assert!(matches!(runner.run("").await, Err(SandboxError::EmptyCode)));
        assert!(matches!(runner.run("  \n\t").await, Err(SandboxError::EmptyCode)));
        assert!(remaining_scripts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn successful_run_returns_stdout() {
        let dir = scratch();
        let runner = sh_runner(dir.path().to_path_buf());
        let output = match runner.run("echo hello").await {
            Ok(o) => o,
            Err(e) => panic!("run failed: {e}"),
        };
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn failing_script_returns_error_text_not_err() {
        let dir = scratch();
        let runner = sh_runner(dir.path().to_path_buf());
        let output = match runner.run("echo oops >&2; exit 3").await {
            Ok(o) => o,
            Err(e) => panic!("script failure must fold into output, got: {e}"),
        };
        assert_eq!(output, "oops");
    }

    #[tokio::test]
    async fn silent_failure_reports_exit_code() {
        let dir = scratch();
        let runner = sh_runner(dir.path().to_path_buf());
        let output = match runner.run("exit 7").await {
            Ok(o) => o,
            Err(e) => panic!("run failed: {e}"),
        };
        assert_eq!(output, "process exited with code 7");
    }

    #[tokio::test]
    async fn timeout_kills_interpreter_and_reports() {
        let dir = scratch();
        let runner = ScriptRunner::new(
            SandboxConfig::new(dir.path().to_path_buf())
                .with_interpreter(PathBuf::from("sh"), vec![])
                .with_timeout(Duration::from_millis(200)),
        );
        let started = Instant::now();
        let output = match runner.run("sleep 30").await {
            Ok(o) => o,
            Err(e) => panic!("timeout must fold into output, got: {e}"),
        };
        assert!(output.contains("timed out"), "got: {output}");
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "the runaway script must not be awaited to completion"
        );
    }

    #[tokio::test]
    async fn no_script_file_remains_after_any_outcome() {
        let dir = scratch();
        let runner = ScriptRunner::new(
            SandboxConfig::new(dir.path().to_path_buf())
                .with_interpreter(PathBuf::from("sh"), vec![])
                .with_timeout(Duration::from_millis(200)),
        );
        for code in ["echo ok", "exit 1", "sleep 30"] {
            if let Err(e) = runner.run(code).await {
                panic!("run of {code:?} errored: {e}");
            }
            assert!(
                remaining_scripts(dir.path()).is_empty(),
                "script file leaked after running {code:?}"
            );
        }
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_error_and_still_cleans_up() {
        let dir = scratch();
        let runner = ScriptRunner::new(
            SandboxConfig::new(dir.path().to_path_buf())
                .with_interpreter(PathBuf::from("/nonexistent/interpreter"), vec![]),
        );
        assert!(matches!(
            runner.run("echo hi").await,
            Err(SandboxError::Spawn { .. })
        ));
        assert!(remaining_scripts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn init_workdir_is_idempotent() {
        let dir = scratch();
        let runner = sh_runner(dir.path().join("nested"));
        for _ in 0..2 {
            if let Err(e) = runner.init_workdir().await {
                panic!("init_workdir must tolerate an existing dir: {e}");
            }
        }
        assert!(dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    #[ignore = "requires python3 on PATH"]
    async fn python_print_round_trip() {
        let dir = scratch();
        let runner = ScriptRunner::new(SandboxConfig::new(dir.path().to_path_buf()));
        let output = match runner.run("print(6 * 7)").await {
            Ok(o) => o,
            Err(e) => panic!("run failed: {e}"),
        };
        assert_eq!(output, "42");
    }

    #[tokio::test]
    #[ignore = "requires python3 on PATH"]
    async fn python_syntax_error_folds_into_output() {
        let dir = scratch();
        let runner = ScriptRunner::new(SandboxConfig::new(dir.path().to_path_buf()));
        let output = match runner.run("def broken(:\n    pass").await {
            Ok(o) => o,
            Err(e) => panic!("syntax errors must fold into output, got: {e}"),
        };
        assert!(output.contains("SyntaxError"), "got: {output}");
    }
}
