//! Signed, time-bound session tokens.
//!
//! Two token classes share one claim shape but are signed with distinct
//! secrets: short-lived access tokens authorize individual requests, and
//! long-lived refresh tokens are exchanged for new access tokens. Neither
//! class is persisted; access-token validity is purely cryptographic, and
//! refresh-token validity additionally requires equality with the refresh
//! secret stored on the account (see `AccountService`).

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mentor_core::Username;

use crate::AuthError;

/// Default access-token lifetime: 15 minutes.
pub const ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Default refresh-token lifetime: 7 days.
pub const REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Claim set carried by both token classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username the token is bound to.
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Unique token id. Two tokens minted for the same user within the same
    /// second still differ, which the refresh-rotation invariant relies on.
    pub jti: Uuid,
}

/// Issues and verifies the two token classes.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a service with the default 15 min / 7 d lifetimes.
    ///
    /// The two secrets must differ; a token of one class never verifies
    /// under the other class's secret.
    #[must_use]
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self::with_ttls(access_secret, refresh_secret, ACCESS_TTL, REFRESH_TTL)
    }

    /// Create a service with custom lifetimes.
    #[must_use]
    pub fn with_ttls(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Access-token lifetime, for cookie Max-Age.
    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh-token lifetime, for cookie Max-Age.
    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue a short-lived access token for `username`.
    ///
    /// # Errors
    /// Returns [`AuthError::Hash`] if encoding fails (malformed key material).
    pub fn issue_access(&self, username: &Username) -> Result<String, AuthError> {
        issue(username, &self.access_encoding, self.access_ttl)
    }

    /// Issue a long-lived refresh token for `username`.
    ///
    /// # Errors
    /// Returns [`AuthError::Hash`] if encoding fails.
    pub fn issue_refresh(&self, username: &Username) -> Result<String, AuthError> {
        issue(username, &self.refresh_encoding, self.refresh_ttl)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenExpired`] past expiry,
    /// [`AuthError::InvalidToken`] for any other verification failure.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        verify(token, &self.access_decoding)
    }

    /// Verify a refresh token's signature and expiry and return its claims.
    ///
    /// Equality with the stored refresh secret is the caller's check; this
    /// method only covers the cryptographic half.
    ///
    /// # Errors
    /// Returns [`AuthError::TokenExpired`] past expiry,
    /// [`AuthError::InvalidToken`] for any other verification failure.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        verify(token, &self.refresh_decoding)
    }
}

fn issue(
    username: &Username,
    key: &EncodingKey,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)]
    let claims = Claims {
        sub: username.as_str().to_owned(),
        iat: now,
        exp: now + ttl.as_secs() as i64,
        jti: Uuid::new_v4(),
    };
    encode(&Header::default(), &claims, key).map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify(token: &str, key: &DecodingKey) -> Result<Claims, AuthError> {
    // No leeway: a token is valid strictly until its exp second.
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}
