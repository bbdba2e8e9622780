//! Service layer for user accounts and the user deletion cascade.

use crate::{
    access::Role,
    error::{Classify, ErrorKind},
    paging::PageRequest,
    task::{
        domain::Task,
        ports::{TaskRepository, TaskRepositoryError},
    },
    user::{
        domain::{NewUser, PlainPassword, User, UserDomainError, UserId, Username},
        ports::{CredentialError, PasswordHasher, UserRepository, UserRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a user account.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    username: String,
    password: String,
}

impl CreateUserRequest {
    /// Creates a request from a username and clear-text password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Service-level errors for user account operations.
#[derive(Debug, Error)]
pub enum UserAccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    NotFound(UserId),
    /// The username is already registered.
    #[error("username {0} already exists")]
    UsernameTaken(Username),
    /// Credential hashing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// User repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

impl Classify for UserAccountError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UsernameTaken(_) => ErrorKind::Conflict,
            Self::Credential(_) => ErrorKind::Storage,
            Self::Repository(err) => err.kind(),
            Self::TaskRepository(err) => err.kind(),
        }
    }
}

/// Result type for user account service operations.
pub type UserAccountResult<T> = Result<T, UserAccountError>;

/// User account orchestration service.
#[derive(Clone)]
pub struct UserAccountService<U, T, H, C>
where
    U: UserRepository,
    T: TaskRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    tasks: Arc<T>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<U, T, H, C> UserAccountService<U, T, H, C>
where
    U: UserRepository,
    T: TaskRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new user account service.
    #[must_use]
    pub const fn new(users: Arc<U>, tasks: Arc<T>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            users,
            tasks,
            hasher,
            clock,
        }
    }

    /// Creates a user with the default role and a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Domain`] for malformed input,
    /// [`UserAccountError::UsernameTaken`] when the username exists, or
    /// hashing and repository errors.
    pub async fn create_user(&self, request: CreateUserRequest) -> UserAccountResult<User> {
        let username = Username::new(request.username)?;
        let password = PlainPassword::new(request.password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            warn!(%username, "username already exists");
            return Err(UserAccountError::UsernameTaken(username));
        }

        let password_hash = self.hasher.hash(&password)?;
        let new_user = NewUser::new(username, password_hash, &*self.clock);
        let user = self.users.store(&new_user).await.map_err(|err| match err {
            UserRepositoryError::DuplicateUsername(taken) => {
                warn!(username = %taken, "username already exists");
                UserAccountError::UsernameTaken(taken)
            }
            other => other.into(),
        })?;
        debug!(user_id = %user.id(), "user created");
        Ok(user)
    }

    /// Retrieves a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::NotFound`] when the user does not exist.
    pub async fn find_user(&self, user_id: UserId) -> UserAccountResult<User> {
        self.find_user_or_error(user_id).await
    }

    /// Finds a user by username, as needed by an authentication layer.
    ///
    /// Returns `Ok(None)` when no user has the username.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Domain`] when the username is malformed,
    /// or repository errors when lookup fails.
    pub async fn find_by_username(&self, username: &str) -> UserAccountResult<Option<User>> {
        let validated = Username::new(username)?;
        Ok(self.users.find_by_username(&validated).await?)
    }

    /// Returns one page of users ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Repository`] when lookup fails.
    pub async fn list_users(&self, page: PageRequest) -> UserAccountResult<Vec<User>> {
        Ok(self.users.list(page).await?)
    }

    /// Returns the tasks currently assigned to a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::NotFound`] when the user does not exist.
    pub async fn find_user_tasks(&self, user_id: UserId) -> UserAccountResult<Vec<Task>> {
        let user = self.find_user_or_error(user_id).await?;
        Ok(self.tasks.find_by_assignee(user.id()).await?)
    }

    /// Changes a user's role. Nothing is written when the role is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::NotFound`] when the user does not exist.
    pub async fn change_role(&self, user_id: UserId, role: Role) -> UserAccountResult<User> {
        let mut user = self.find_user_or_error(user_id).await?;
        if user.change_role(role, &*self.clock) {
            self.users.update(&user).await?;
            info!(user_id = %user_id, %role, "user role changed");
        }
        Ok(user)
    }

    /// Deletes a user.
    ///
    /// Every task the user owns that is not `Done` or `Cancelled` at the
    /// moment of deletion is put back to `Planned`. The resets, the
    /// unassignment of all the user's tasks and the removal of the user are
    /// decided and written by the store as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::NotFound`] when the user does not exist, or
    /// repository errors; nothing is written on failure.
    pub async fn delete_user(&self, user_id: UserId) -> UserAccountResult<()> {
        let released = self
            .users
            .delete_releasing_tasks(user_id, self.clock.utc())
            .await
            .map_err(|err| match err {
                UserRepositoryError::NotFound(id) => {
                    warn!(user_id = %id, "user not found");
                    UserAccountError::NotFound(id)
                }
                other => other.into(),
            })?;
        debug!(user_id = %user_id, released, "user deleted");
        Ok(())
    }

    async fn find_user_or_error(&self, user_id: UserId) -> UserAccountResult<User> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "user not found");
            UserAccountError::NotFound(user_id)
        })
    }
}
