//! Port for one-way password hashing.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// The hasher failed to produce or parse a digest.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hash and verify passwords.
///
/// Hashing is CPU-bound and synchronous; adapters must be cheap to share.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHasherError>;

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHasherError>;
}
