//! Error types for the auth crate.

use mentor_core::Username;

/// Errors that can occur during credential operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Login failed. Deliberately identical for unknown users and wrong
    /// passwords so callers cannot probe which usernames exist.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A token's signature was valid but its expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// A token failed verification for any reason other than expiry, or a
    /// presented refresh token does not match the stored refresh secret.
    #[error("invalid token")]
    InvalidToken,

    /// A verified token named a user that no longer exists.
    #[error("unknown user: {0}")]
    UnknownUser(Username),

    /// Signup attempted with a username that is already registered.
    #[error("username already taken: {0}")]
    UsernameTaken(Username),

    /// No API key could be resolved for the request.
    #[error("no API key available; provide one or configure a default")]
    NoApiKey,

    /// An API key update was attempted with an empty value.
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// Password hashing or hash parsing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The credential store could not complete an operation.
    #[error("credential store failure: {0}")]
    Store(String),
}
