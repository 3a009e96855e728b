//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use zeroize::Zeroizing;

use crate::error::{ExpenseError, ExpenseResult, ValidationErrors};

pub const MIN_PASSWORD_LEN: usize = 6;

/// A plaintext password, wiped from memory on drop
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(Zeroizing::new(plaintext.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Reject passwords shorter than [`MIN_PASSWORD_LEN`] characters
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        if self.0.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationErrors::single(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }

    /// Hash with a fresh random salt
    pub fn hash(&self) -> ExpenseResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ExpenseError::Auth(format!("Failed to hash password: {}", e)))
    }

    /// Check against a stored PHC string
    pub fn verify(&self, stored_hash: &str) -> ExpenseResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| ExpenseError::Auth(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(self.0.as_bytes(), &parsed)
            .is_ok())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Read a password from the terminal without echo
pub fn prompt_password(prompt: &str) -> ExpenseResult<Password> {
    rpassword::prompt_password(prompt)
        .map(Password::new)
        .map_err(|e| ExpenseError::Auth(format!("Failed to read password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("hunter22");
        let hash = password.hash().unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(password.verify(&hash).unwrap());
        assert!(!Password::new("hunter23").verify(&hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let password = Password::new("hunter22");
        assert_ne!(password.hash().unwrap(), password.hash().unwrap());
    }

    #[test]
    fn test_minimum_length() {
        assert!(Password::new("12345").validate().is_err());
        assert!(Password::new("123456").validate().is_ok());
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(Password::new("hunter22").verify("not-a-hash").is_err());
    }

    #[test]
    fn test_debug_hides_plaintext() {
        let rendered = format!("{:?}", Password::new("hunter22"));
        assert!(!rendered.contains("hunter22"));
    }
}
