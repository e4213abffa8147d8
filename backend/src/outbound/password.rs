//! Argon2id password hashing.
//!
//! Digests are stored in PHC string format so parameters travel with the
//! hash and can be raised later without a migration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// [`PasswordHasher`] backed by Argon2id with the crate's default parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHasherError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_password_only() {
        let hasher = Argon2PasswordHasher::new();
        let digest = hasher.hash("hunter22").expect("hash");
        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("hunter22", &digest).expect("verify"));
        assert!(!hasher.verify("hunter23", &digest).expect("verify"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("hunter22").expect("hash");
        let second = hasher.hash("hunter22").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_digest_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        let err = hasher
            .verify("hunter22", &PasswordDigest::new("not-a-phc-string"))
            .expect_err("unparseable digest");
        assert!(err.to_string().contains("password hashing failed"));
    }
}
