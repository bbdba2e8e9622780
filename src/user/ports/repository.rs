//! Repository port for user persistence and lookup.

use crate::error::{Classify, ErrorKind};
use crate::paging::PageRequest;
use crate::user::domain::{NewUser, User, UserId, Username};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUsername`] when the username
    /// is already taken.
    async fn store(&self, user: &NewUser) -> UserRepositoryResult<User>;

    /// Persists changes to an existing user (role, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist.
    async fn update(&self, user: &User) -> UserRepositoryResult<()>;

    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by unique username.
    ///
    /// Returns `None` when no user has the given username.
    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>>;

    /// Returns one page of users ordered by identifier.
    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Vec<User>>;

    /// Deletes a user in one atomic unit with the release of their tasks.
    ///
    /// Inside the same unit, every task currently assigned to the user is
    /// unassigned, and those that are not `Done` or `Cancelled` at that
    /// moment are reset to `Planned` with `released_at` as their update
    /// time. Either all of this happens or none of it does.
    ///
    /// Returns the number of tasks reset to `Planned`.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not
    /// exist.
    async fn delete_releasing_tasks(
        &self,
        id: UserId,
        released_at: DateTime<Utc>,
    ) -> UserRepositoryResult<usize>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// A user with the same username already exists.
    #[error("duplicate username: {0}")]
    DuplicateUsername(Username),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for UserRepositoryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateUsername(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Storage,
        }
    }
}
