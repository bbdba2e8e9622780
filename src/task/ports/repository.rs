//! Repository port for task persistence and lookup.

use crate::error::{Classify, ErrorKind};
use crate::paging::PageRequest;
use crate::task::domain::{NewTask, Task, TaskId};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Lookups return `None` or an empty collection for unknown identifiers;
/// callers decide whether absence is an error.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the store fails.
    async fn store(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Persists changes to an existing task (state, assignee, fields,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::UnknownAssignee`] when the assignee does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns `true` when a task with the identifier exists.
    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns every task assigned to `user`, ordered by identifier.
    async fn find_by_assignee(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns one page of tasks ordered by identifier.
    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task references a user that does not exist.
    #[error("task assignee does not exist: {0}")]
    UnknownAssignee(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for TaskRepositoryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::UnknownAssignee(_) => ErrorKind::NotFound,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Storage,
        }
    }
}
