//! Password hashing (Argon2id, salted).
//!
//! The stored hash is a PHC string; the salt and parameters travel inside it,
//! so verification needs nothing but the hash itself.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{error, warn};

use crate::error::AppError;

pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AppError::Internal
        })?;

    Ok(hashed.to_string())
}

/// Constant-time verification against a stored PHC hash.
///
/// Returns false (never an error) on mismatch or on an unparseable stored
/// hash; login failures must all collapse to the same outcome.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trips() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(verify("correct horse battery staple", &hashed));
    }

    #[test]
    fn wrong_password_fails() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(!verify("Tr0ub4dor&3", &hashed));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Salted: two hashes of one password must differ.
        let a = hash("hunter2").unwrap();
        let b = hash("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(verify("hunter2", &a));
        assert!(verify("hunter2", &b));
    }

    #[test]
    fn garbage_stored_hash_verifies_false() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
