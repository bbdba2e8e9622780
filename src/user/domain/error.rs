//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The user identifier is not a positive integer.
    #[error("invalid user identifier {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username is not shaped like an e-mail address.
    #[error("username '{0}' must be an e-mail address")]
    InvalidUsername(String),

    /// The username exceeds the storage limit.
    #[error("username exceeds {max} character limit: {0}", max = super::Username::MAX_LENGTH)]
    UsernameTooLong(String),

    /// The password is empty after trimming.
    #[error("password must not be empty")]
    EmptyPassword,
}
