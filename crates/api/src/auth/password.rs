//! Password hashing.
//!
//! Hashes are Argon2id PHC strings. A user row without one has no usable
//! password and can only log in after `/api/auth/set-password/`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `Ok(false)` for a wrong password; `Err` means the stored hash itself is
/// unreadable.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_verifies_original_password_only() {
        let stored = hash_password("substation-7-key").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("substation-7-key", &stored).unwrap());
        assert!(!verify_password("substation-8-key", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw-12345").unwrap(), hash_password("pw-12345").unwrap());
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-left-in-db").is_err());
    }
}
