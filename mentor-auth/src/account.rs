//! Account lifecycle: signup, login, refresh, logout.
//!
//! The credential state machine: Anonymous → Authenticated(access, refresh)
//! → AccessExpired(refresh still valid) → Revoked. A successful login
//! persists the issued refresh token as the account's refresh secret, which
//! implicitly revokes every previously issued refresh token for that
//! account; presenting a rotated-out token fails the equality check in
//! [`AccountService::refresh`].

use std::sync::Arc;

use mentor_core::{UserRecord, Username};

use crate::password::{hash_password, verify_password};
use crate::store::CredentialStore;
use crate::token::TokenService;
use crate::AuthError;

/// Token pair handed out at login.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// Short-lived access token.
    pub access: String,
    /// Long-lived refresh token; also persisted as the refresh secret.
    pub refresh: String,
}

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Freshly issued access token.
    pub access: String,
    /// New refresh token, present only when rotation-on-refresh is enabled.
    pub refresh: Option<String>,
}

/// Signup/login/refresh/logout flows over a [`CredentialStore`].
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
    rotate_refresh: bool,
}

impl AccountService {
    /// Create a service. `rotate_refresh` enables sliding-window rotation:
    /// every successful refresh also mints and persists a new refresh token.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService, rotate_refresh: bool) -> Self {
        Self { store, tokens, rotate_refresh }
    }

    /// The underlying token service, shared with the credential gate.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new account.
    ///
    /// The password is hashed before storage; the record starts with no
    /// refresh secret and no API key.
    ///
    /// # Errors
    /// Returns [`AuthError::UsernameTaken`] for duplicate usernames,
    /// [`AuthError::Hash`] if hashing fails.
    pub async fn signup(&self, username: Username, password: &str) -> Result<(), AuthError> {
        let password_hash = hash_password(password)?;
        self.store
            .create(UserRecord::new(username.clone(), password_hash))
            .await?;
        tracing::info!(username = %username, "account created");
        Ok(())
    }

    /// Authenticate with username + password and mint a token pair.
    ///
    /// The refresh token is persisted as the account's refresh secret,
    /// rotating out any previously issued refresh token.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or
    /// a wrong password — identical in both cases.
    pub async fn login(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<SessionTokens, AuthError> {
        let record = self
            .store
            .find(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access = self.tokens.issue_access(username)?;
        let refresh = self.tokens.issue_refresh(username)?;
        self.store
            .set_refresh_secret(username, Some(refresh.clone()))
            .await?;

        tracing::info!(username = %username, "login succeeded, refresh secret rotated");
        Ok(SessionTokens { access, refresh })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Acceptance requires all three: valid signature, unexpired, and exact
    /// equality with the refresh secret currently stored for the claimed
    /// username. The equality check is the only revocation mechanism —
    /// rotated-out and server-side-revoked tokens fail here.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenExpired`] / [`AuthError::InvalidToken`] on
    /// verification failure, [`AuthError::UnknownUser`] if the claimed
    /// account is gone, [`AuthError::InvalidToken`] on secret mismatch.
    pub async fn refresh(&self, presented: &str) -> Result<RefreshOutcome, AuthError> {
        let claims = self.tokens.verify_refresh(presented)?;
        let username =
            Username::new(claims.sub.clone()).map_err(|_| AuthError::InvalidToken)?;

        let record = self
            .store
            .find(&username)
            .await?
            .ok_or_else(|| AuthError::UnknownUser(username.clone()))?;

        if record.refresh_secret.as_deref() != Some(presented) {
            tracing::warn!(username = %username, "refresh token does not match stored secret");
            return Err(AuthError::InvalidToken);
        }

        let access = self.tokens.issue_access(&username)?;
        let refresh = if self.rotate_refresh {
            let next = self.tokens.issue_refresh(&username)?;
            self.store
                .set_refresh_secret(&username, Some(next.clone()))
                .await?;
            Some(next)
        } else {
            None
        };

        Ok(RefreshOutcome { access, refresh })
    }

    /// Revoke the account's refresh secret server-side.
    ///
    /// Idempotent: logging out an account with no stored secret succeeds.
    ///
    /// # Errors
    /// Returns [`AuthError::UnknownUser`] if the account does not exist.
    pub async fn logout(&self, username: &Username) -> Result<(), AuthError> {
        self.store.set_refresh_secret(username, None).await?;
        tracing::info!(username = %username, "refresh secret revoked");
        Ok(())
    }
}
