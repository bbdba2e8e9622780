//! Identifier types for the user domain.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned numeric identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidUserId`] when the value is zero or
    /// negative.
    pub const fn new(value: i64) -> Result<Self, UserDomainError> {
        if value <= 0 {
            return Err(UserDomainError::InvalidUserId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
