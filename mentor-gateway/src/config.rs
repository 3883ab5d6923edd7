//! Environment-driven gateway configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the gateway binary.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Listen address, `MENTOR_LISTEN_ADDR`.
    pub listen_addr: String,
    /// Access-token signing secret, `MENTOR_ACCESS_SECRET`.
    pub access_secret: String,
    /// Refresh-token signing secret, `MENTOR_REFRESH_SECRET`.
    pub refresh_secret: String,
    /// Process-wide fallback generative-model key, `MENTOR_DEFAULT_API_KEY`.
    pub default_api_key: Option<String>,
    /// Whether requests without a per-user key may use the default,
    /// `MENTOR_ALLOW_KEY_FALLBACK`.
    pub allow_key_fallback: bool,
    /// Whether a successful refresh also rotates the refresh token,
    /// `MENTOR_ROTATE_REFRESH`.
    pub rotate_refresh: bool,
    /// Sandbox working directory, `MENTOR_SANDBOX_DIR`.
    pub sandbox_dir: PathBuf,
    /// Interpreter binary for submitted code, `MENTOR_PYTHON_BIN`.
    pub python_bin: PathBuf,
    /// Wall-clock limit per execution, `MENTOR_EXEC_TIMEOUT_SECS`.
    pub exec_timeout: Duration,
    /// Generative backend base URL, `MENTOR_GENAI_URL`.
    pub genai_url: String,
    /// Generative model name, `MENTOR_GENAI_MODEL`.
    pub genai_model: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Signing secrets fall back to development values with a warning so a
    /// bare checkout still runs; production deployments must set them.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("MENTOR_LISTEN_ADDR", "127.0.0.1:3000"),
            access_secret: secret_or_dev("MENTOR_ACCESS_SECRET", "dev-access-secret"),
            refresh_secret: secret_or_dev("MENTOR_REFRESH_SECRET", "dev-refresh-secret"),
            default_api_key: std::env::var("MENTOR_DEFAULT_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            allow_key_fallback: env_flag("MENTOR_ALLOW_KEY_FALLBACK", true),
            rotate_refresh: env_flag("MENTOR_ROTATE_REFRESH", false),
            sandbox_dir: std::env::var("MENTOR_SANDBOX_DIR")
                .map_or_else(|_| std::env::temp_dir().join("mentor-sandbox"), PathBuf::from),
            python_bin: PathBuf::from(env_or("MENTOR_PYTHON_BIN", "python3")),
            exec_timeout: Duration::from_secs(env_u64("MENTOR_EXEC_TIMEOUT_SECS", 10)),
            genai_url: env_or(
                "MENTOR_GENAI_URL",
                "https://generativelanguage.googleapis.com",
            ),
            genai_model: env_or("MENTOR_GENAI_MODEL", "gemini-1.5-flash"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn secret_or_dev(name: &str, dev_default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        tracing::warn!(var = name, "signing secret not set, using development default");
        dev_default.to_owned()
    })
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
