//! Password handling.
//!
//! Plaintext passwords travel as [`Password`], which wraps a
//! `secrecy::SecretString` so they never show up in Debug output or logs.
//! Stored hashes are Argon2id PHC strings (`$argon2id$v=19$...`).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::{StoreError, StoreResult};

/// A plaintext password supplied by a user.
pub struct Password(SecretString);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    fn expose(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &Password) -> StoreResult<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    let hash = Argon2::default()
        .hash_password(password.expose(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &Password, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.expose(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("monsoon-2024");
        let stored = hash_password(&password).unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("monsoon"));
        assert!(verify_password(&password, &stored));
        assert!(!verify_password(&Password::new("monsoon-2025"), &stored));
    }

    #[test]
    fn test_salts_differ() {
        let password = Password::new("same");
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();

        assert_ne!(first, second);
        assert!(verify_password(&password, &first));
        assert!(verify_password(&password, &second));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let password = Password::new("x");
        assert!(!verify_password(&password, ""));
        assert!(!verify_password(&password, "not a hash"));
        assert!(!verify_password(&password, "sha256$10000$salt$abc"));
        assert!(!verify_password(&password, "$argon2id$v=19$m=19456,t=2,p=1$truncated"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("hunter2");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }
}
