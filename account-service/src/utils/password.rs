use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Why verification failed. A mismatch is an expected business outcome; an
/// unreadable stored hash is data corruption and must not look like one.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Stored password hash is unreadable: {0}")]
    BadHash(String),
    #[error("Password verification failed")]
    Mismatch,
}

/// Newtype for a plaintext password to prevent accidental logging
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newtype for an encoded password hash
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a password with Argon2id. The salt is generated here and encoded
/// into the hash string.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(PasswordHashString::new(password_hash))
}

/// Verify a password against a stored hash. Returns Ok(()) on a match.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(password_hash.as_str())
        .map_err(|e| PasswordError::BadHash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2_encoded() {
        let password = Password::new("correct horse battery".to_string());
        let hash = hash_password(&password).expect("hash");
        assert!(hash.as_str().starts_with("$argon2"));
    }

    #[test]
    fn correct_password_verifies() {
        let password = Password::new("correct horse battery".to_string());
        let hash = hash_password(&password).expect("hash");
        assert!(verify_password(&password, &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let password = Password::new("correct horse battery".to_string());
        let hash = hash_password(&password).expect("hash");
        let wrong = Password::new("incorrect horse".to_string());
        assert!(matches!(
            verify_password(&wrong, &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn an_unreadable_hash_is_not_a_mismatch() {
        let password = Password::new("correct horse battery".to_string());
        let garbage = PasswordHashString::new("not-a-phc-string".to_string());
        assert!(matches!(
            verify_password(&password, &garbage),
            Err(PasswordError::BadHash(_))
        ));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let password = Password::new("correct horse battery".to_string());
        let hash1 = hash_password(&password).expect("hash");
        let hash2 = hash_password(&password).expect("hash");
        assert_ne!(hash1.as_str(), hash2.as_str());
        assert!(verify_password(&password, &hash2).is_ok());
    }
}
