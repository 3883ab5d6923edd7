//! Credential lifecycle for the Mentor tutoring backend.
//!
//! Covers password hashing, issuance/verification/rotation of the two
//! session-token classes, the credential-store seam, the account state
//! machine, and per-user generative-model API keys.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod account;
pub mod apikey;
pub mod error;
pub mod password;
pub mod store;
pub mod token;

pub use account::{AccountService, RefreshOutcome, SessionTokens};
pub use apikey::ApiKeyManager;
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use store::{CredentialStore, MemoryStore};
pub use token::{Claims, TokenService, ACCESS_TTL, REFRESH_TTL};
