use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum accepted username length, in characters.
pub const MAX_USERNAME_LEN: usize = 64;

/// Identifies a user account. Unique and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a validated `Username` from any string-like value.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyUsername`] if the trimmed value is empty,
    /// or [`CoreError::UsernameTooLong`] past [`MAX_USERNAME_LEN`] chars.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyUsername);
        }
        let len = trimmed.chars().count();
        if len > MAX_USERNAME_LEN {
            return Err(CoreError::UsernameTooLong { len, max: MAX_USERNAME_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted user account.
///
/// The password hash is opaque to everything outside the auth layer and is
/// never serialized onto the wire. The refresh secret holds the most recently
/// issued refresh token; overwriting it invalidates every prior refresh token
/// for this account.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct UserRecord {
    /// Unique account key.
    pub username: Username,
    /// PHC-format password hash, set at signup.
    pub password_hash: String,
    /// Most recently issued refresh token; `None` until first login and
    /// after server-side revocation.
    pub refresh_secret: Option<String>,
    /// The user's own generative-model API key, if they provided one.
    pub api_key: Option<String>,
}

impl UserRecord {
    /// Create a fresh account record with no refresh secret and no API key.
    #[must_use]
    pub fn new(username: Username, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            refresh_secret: None,
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_trims_surrounding_whitespace() {
        let name = match Username::new("  alice  ") {
            Ok(n) => n,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn username_rejects_empty_and_whitespace() {
        assert!(matches!(Username::new(""), Err(CoreError::EmptyUsername)));
        assert!(matches!(Username::new("   "), Err(CoreError::EmptyUsername)));
    }

    #[test]
    fn username_rejects_overlong_names() {
        let long = "x".repeat(MAX_USERNAME_LEN + 1);
        assert!(
            matches!(Username::new(long), Err(CoreError::UsernameTooLong { .. })),
            "names past the limit must be rejected"
        );
    }

    #[test]
    fn username_serde_is_transparent() {
        let name = match Username::new("bob") {
            Ok(n) => n,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let json = match serde_json::to_string(&name) {
            Ok(s) => s,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, "\"bob\"", "Username must serialize as a bare string");
    }

    #[test]
    fn user_record_new_starts_with_no_secrets() {
        let name = match Username::new("carol") {
            Ok(n) => n,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let record = UserRecord::new(name, "$argon2id$stub".to_owned());
        assert!(record.refresh_secret.is_none(), "fresh account must have no refresh secret");
        assert!(record.api_key.is_none(), "fresh account must have no API key");
    }

    proptest::proptest! {
        #[test]
        fn proptest_valid_usernames_round_trip(
            raw in "[a-zA-Z0-9_.-]{1,64}",
        ) {
            let name = match Username::new(raw.clone()) {
                Ok(n) => n,
                Err(e) => panic!("valid name rejected: {e}"),
            };
            proptest::prop_assert_eq!(name.as_str(), raw.trim());
        }
    }
}
