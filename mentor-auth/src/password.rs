//! Password hashing with Argon2id.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::AuthError;

/// OWASP minimum Argon2id params: m=19456 KiB, t=2 iterations, p=1 thread.
fn argon2_instance() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(19456, 2, 1, None).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

/// Hash a password into a PHC-format string with a fresh random salt.
///
/// # Errors
/// Returns [`AuthError::Hash`] if the hasher rejects its inputs.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_instance()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash.
///
/// Params come from the hash itself, so hashes produced under older tuning
/// still verify.
///
/// # Errors
/// Returns [`AuthError::Hash`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_correct_password() {
        let hash = match hash_password("hunter2") {
            Ok(h) => h,
            Err(e) => panic!("hashing failed: {e}"),
        };
        let ok = match verify_password("hunter2", &hash) {
            Ok(v) => v,
            Err(e) => panic!("verification errored: {e}"),
        };
        assert!(ok, "correct password must verify");
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = match hash_password("hunter2") {
            Ok(h) => h,
            Err(e) => panic!("hashing failed: {e}"),
        };
        let ok = match verify_password("hunter3", &hash) {
            Ok(v) => v,
            Err(e) => panic!("verification errored: {e}"),
        };
        assert!(!ok, "wrong password must not verify");
    }

    #[test]
    fn verify_rejects_garbage_stored_hash() {
        let result = verify_password("hunter2", "not-a-phc-string");
        assert!(
            matches!(result, Err(AuthError::Hash(_))),
            "unparseable stored hash must error, not verify"
        );
    }

    #[test]
    fn hashes_are_salted_per_call() {
        let a = match hash_password("same") {
            Ok(h) => h,
            Err(e) => panic!("hashing failed: {e}"),
        };
        let b = match hash_password("same") {
            Ok(h) => h,
            Err(e) => panic!("hashing failed: {e}"),
        };
        assert_ne!(a, b, "two hashes of the same password must differ by salt");
    }
}
