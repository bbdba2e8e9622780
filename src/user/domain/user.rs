//! User aggregate root.

use super::{PasswordHash, Role, UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// User aggregate root.
///
/// The tasks a user owns are not stored here; they are the tasks whose
/// assignee is this user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    username: Username,
    #[serde(skip)]
    password_hash: PasswordHash,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated user that has not been given an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: Username,
    password_hash: PasswordHash,
    role: Role,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted credential.
    pub password_hash: PasswordHash,
    /// Persisted role.
    pub role: Role,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Creates a user draft with the default [`Role::User`] role.
    #[must_use]
    pub fn new(username: Username, password_hash: PasswordHash, clock: &impl Clock) -> Self {
        Self {
            username,
            password_hash,
            role: Role::User,
            created_at: clock.utc(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the hashed credential.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Turns the draft into a user with the store-assigned identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            password_hash: data.password_hash,
            role: data.role,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the hashed credential.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Changes the role. Returns `false` without touching the user when the
    /// role is already `role`.
    pub fn change_role(&mut self, role: Role, clock: &impl Clock) -> bool {
        if self.role == role {
            return false;
        }
        self.role = role;
        self.updated_at = clock.utc();
        true
    }
}
