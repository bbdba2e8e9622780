//! Password value objects.
//!
//! Neither type prints its contents through `Debug`, so credentials never
//! end up in logs by accident.

use super::UserDomainError;
use std::fmt;

/// Clear-text password, only alive for the duration of a creation call.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Wraps a clear-text password.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyPassword`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(UserDomainError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Exposes the clear-text bytes to a hasher.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// Opaque hashed credential as produced by a password hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash produced by a hasher or read from storage.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded hash for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
