//! Argon2id password hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::server::error::{internal::InternalError, AppError};

/// Hashes a password with Argon2id and a random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| InternalError::PasswordHash(e.to_string()))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| InternalError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash.
///
/// A stored value that is not a valid hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs a verification against a throwaway hash so a login for an unknown account
/// costs the same as one with a wrong password.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();

    DUMMY
        .get_or_init(|| hash_password("imghost-unknown-account").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_correct_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
    }

    #[test]
    fn rejects_wrong_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn rejects_malformed_hash() {
        assert!(!verify_password("hunter22", "not-a-real-hash"));
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_hash_is_a_real_hash() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("hunter22", hash));
        assert_eq!(dummy_hash(), Some(hash));
    }
}
