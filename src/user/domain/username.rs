//! Validated, unique login name.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username in e-mail form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Storage limit for usernames.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyUsername`] for blank input,
    /// [`UserDomainError::UsernameTooLong`] beyond [`Self::MAX_LENGTH`]
    /// characters, or [`UserDomainError::InvalidUsername`] when the value is
    /// not shaped like `local@domain.tld`.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(UserDomainError::EmptyUsername);
        }
        if normalized.chars().count() > Self::MAX_LENGTH {
            return Err(UserDomainError::UsernameTooLong(normalized.to_owned()));
        }
        if !is_email_shaped(normalized) {
            return Err(UserDomainError::InvalidUsername(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
