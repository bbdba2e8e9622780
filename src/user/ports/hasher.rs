//! Credential hashing port.

use crate::user::domain::{PasswordHash, PlainPassword};
use std::sync::Arc;
use thiserror::Error;

/// Turns clear-text passwords into opaque credentials.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a clear-text password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the hasher cannot produce a hash.
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, CredentialError>;

    /// Checks a clear-text password against a stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::UnsupportedFormat`] when `hash` was not
    /// produced by this hasher, or [`CredentialError::ExcessiveCost`] when
    /// its cost parameters exceed the hasher's own.
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialError>;
}

/// Errors returned by password hashers.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The stored credential is not in a format this hasher understands.
    #[error("unsupported credential format")]
    UnsupportedFormat,

    /// The stored credential demands more work than this hasher allows.
    #[error("credential cost parameters exceed the configured limits")]
    ExcessiveCost,

    /// The hashing backend failed.
    #[error("credential hashing failed: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}
