//! Credential store abstraction.
//!
//! The persistent user store is an external collaborator; this trait is the
//! seam the rest of the system talks through. [`MemoryStore`] is the
//! process-local implementation used by the binary and the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mentor_core::{UserRecord, Username};

use crate::AuthError;

/// Typed operations against persisted account records, keyed by username.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
/// Each method is a single atomic operation; callers get no cross-operation
/// transaction.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by username.
    ///
    /// # Errors
    /// Returns [`AuthError::Store`] if the backing store fails.
    async fn find(&self, username: &Username) -> Result<Option<UserRecord>, AuthError>;

    /// Create a new account record.
    ///
    /// # Errors
    /// Returns [`AuthError::UsernameTaken`] if the username already exists.
    async fn create(&self, record: UserRecord) -> Result<(), AuthError>;

    /// Replace the account's stored refresh secret. `None` revokes it.
    ///
    /// # Errors
    /// Returns [`AuthError::UnknownUser`] if the account does not exist.
    async fn set_refresh_secret(
        &self,
        username: &Username,
        secret: Option<String>,
    ) -> Result<(), AuthError>;

    /// Replace the account's stored API key. `None` clears it.
    ///
    /// # Errors
    /// Returns [`AuthError::UnknownUser`] if the account does not exist.
    async fn set_api_key(
        &self,
        username: &Username,
        api_key: Option<String>,
    ) -> Result<(), AuthError>;
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Username, UserRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find(&self, username: &Username) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn create(&self, record: UserRecord) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.username) {
            return Err(AuthError::UsernameTaken(record.username));
        }
        records.insert(record.username.clone(), record);
        Ok(())
    }

    async fn set_refresh_secret(
        &self,
        username: &Username,
        secret: Option<String>,
    ) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(username)
            .ok_or_else(|| AuthError::UnknownUser(username.clone()))?;
        record.refresh_secret = secret;
        Ok(())
    }

    async fn set_api_key(
        &self,
        username: &Username,
        api_key: Option<String>,
    ) -> Result<(), AuthError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(username)
            .ok_or_else(|| AuthError::UnknownUser(username.clone()))?;
        record.api_key = api_key;
        Ok(())
    }
}
