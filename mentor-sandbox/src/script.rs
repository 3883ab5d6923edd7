//! Ephemeral script files with guaranteed cleanup.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::SandboxError;

/// A uniquely named script file that lives for one execution.
///
/// The uuid-based name makes concurrent runs in the shared workdir
/// collision-free. The file is removed by [`ScriptFile::remove`] on the
/// normal path and by `Drop` on every other path, so no exit leaves the
/// file behind; a failed removal is logged and never alters the response.
#[derive(Debug)]
pub struct ScriptFile {
    path: PathBuf,
    removed: bool,
}

impl ScriptFile {
    /// Write `code` verbatim to a fresh `script_<uuid>.py` inside `workdir`.
    ///
    /// # Errors
    /// Returns [`SandboxError::Io`] if the write fails.
    pub async fn create(workdir: &Path, code: &str) -> Result<Self, SandboxError> {
        let path = workdir.join(format!("script_{}.py", Uuid::new_v4().simple()));
        tokio::fs::write(&path, code).await?;
        Ok(Self { path, removed: false })
    }

    /// Path to hand to the interpreter.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now instead of waiting for `Drop`.
    pub async fn remove(mut self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove script file");
        }
        self.removed = true;
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove script file");
        }
    }
}
