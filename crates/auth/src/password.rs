//! Salted password hashing (Argon2id, PHC string format).
//!
//! Both functions are CPU-bound; async callers should run them on a blocking
//! thread.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Hash `plaintext` with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Check `plaintext` against a stored hash. A malformed hash never matches.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("pw", "pw"));
        assert!(!verify_password("pw", ""));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn hash_never_equals_plaintext_and_verifies(password in "[ -~]{1,32}") {
            let hash = hash_password(&password).unwrap();
            prop_assert_ne!(&hash, &password);
            prop_assert!(verify_password(&password, &hash));
        }
    }
}
