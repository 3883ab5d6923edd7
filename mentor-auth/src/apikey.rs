//! Per-user generative-model API keys.
//!
//! Resolution order: the account's persisted key, then the default key the
//! manager was constructed with (when fallback is allowed). The default is
//! injected at construction rather than read from process-wide mutable
//! state, so resolution order is explicit and race-free.

use std::sync::Arc;

use mentor_core::{UserRecord, Username};

use crate::store::CredentialStore;
use crate::AuthError;

/// Get/set/clear per-user API keys with an optional process-default fallback.
pub struct ApiKeyManager {
    store: Arc<dyn CredentialStore>,
    default_key: Option<String>,
    allow_fallback: bool,
}

impl ApiKeyManager {
    /// Create a manager.
    ///
    /// `allow_fallback` gates the anonymous/default-key mode: when false,
    /// only a per-user key resolves and unauthenticated callers always get
    /// [`AuthError::NoApiKey`].
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        default_key: Option<String>,
        allow_fallback: bool,
    ) -> Self {
        Self { store, default_key, allow_fallback }
    }

    /// Resolve the key to use for a request.
    ///
    /// # Errors
    /// Returns [`AuthError::NoApiKey`] when neither a per-user key nor an
    /// allowed default is available.
    pub fn resolve(&self, user: Option<&UserRecord>) -> Result<String, AuthError> {
        if let Some(key) = user.and_then(|u| u.api_key.clone()) {
            return Ok(key);
        }
        if self.allow_fallback {
            if let Some(key) = self.default_key.clone() {
                return Ok(key);
            }
        }
        Err(AuthError::NoApiKey)
    }

    /// Persist a new key for the account, overwriting any prior value.
    ///
    /// # Errors
    /// Returns [`AuthError::EmptyApiKey`] for a blank key,
    /// [`AuthError::UnknownUser`] if the account does not exist.
    pub async fn set(&self, username: &Username, key: &str) -> Result<(), AuthError> {
        if key.trim().is_empty() {
            return Err(AuthError::EmptyApiKey);
        }
        self.store
            .set_api_key(username, Some(key.to_owned()))
            .await
    }

    /// Clear the account's key. Idempotent.
    ///
    /// # Errors
    /// Returns [`AuthError::UnknownUser`] if the account does not exist.
    pub async fn clear(&self, username: &Username) -> Result<(), AuthError> {
        self.store.set_api_key(username, None).await
    }
}
