//! Generative-model backend seam.
//!
//! The backend is an external collaborator reached through one operation:
//! generate text from prompt text. [`GeminiClient`] is the production
//! implementation; tests substitute their own [`GenerativeModel`].

use async_trait::async_trait;
use serde_json::json;

/// Errors from the generative backend call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenAiError {
    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("request to generative backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("generative backend returned status {status}")]
    BadStatus { status: u16 },

    /// The backend answered 200 but carried no candidate text.
    #[error("generative backend returned no text")]
    EmptyResponse,
}

/// One-operation seam to the generative-AI backend.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a text completion for `prompt`, authenticated by `api_key`.
    ///
    /// # Errors
    /// Returns [`GenAiError`] when the backend cannot produce text.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GenAiError>;
}

/// HTTP client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client against `base_url` (no trailing slash) and `model`.
    #[must_use]
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GenAiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenAiError::BadStatus { status: status.as_u16() });
        }

        let payload: serde_json::Value = response.json().await?;
        candidate_text(&payload).ok_or(GenAiError::EmptyResponse)
    }
}

/// Concatenated text parts of the first candidate, if any.
fn candidate_text(payload: &serde_json::Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
