//! Service layer for task creation, editing, assignment, and state changes.

use crate::{
    access::{AccessDenied, PrivilegedAction, Role, authorize},
    error::{Classify, ErrorKind},
    paging::PageRequest,
    task::{
        domain::{
            NewTask, Task, TaskDescription, TaskDomainError, TaskEdit, TaskId, TaskState,
            TransitionRejection,
        },
        ports::{TaskRepository, TaskRepositoryError},
    },
    user::{
        domain::{User, UserId},
        ports::{UserRepository, UserRepositoryError},
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    description: String,
    deadline: NaiveDate,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(description: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            description: description.into(),
            deadline,
        }
    }
}

/// Request payload for editing task fields. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    description: Option<String>,
    deadline: Option<NaiveDate>,
}

impl EditTaskRequest {
    /// Creates an empty edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a replacement deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The transition policy rejected the requested state.
    #[error(transparent)]
    Transition(#[from] TransitionRejection),
    /// The caller's role does not permit the action.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
}

impl Classify for TaskLifecycleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Transition(rejection) => rejection.kind(),
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::TaskNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::Repository(err) => err.kind(),
            Self::UserRepository(err) => err.kind(),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, U, C> TaskLifecycleService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Creates a `Planned`, unassigned task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank description or a
    /// deadline in the past, or repository errors when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let description = TaskDescription::new(request.description)?;
        let new_task = NewTask::new(description, request.deadline, &*self.clock)?;
        let task = self.tasks.store(&new_task).await?;
        debug!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_task_or_error(task_id).await
    }

    /// Returns one page of tasks ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, page: PageRequest) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list(page).await?)
    }

    /// Returns the user a task is assigned to.
    ///
    /// Returns `Ok(None)` when the task is unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or repository errors when lookup fails.
    pub async fn find_assignee(&self, task_id: TaskId) -> TaskLifecycleResult<Option<User>> {
        let task = self.find_task_or_error(task_id).await?;
        let Some(user_id) = task.assignee() else {
            warn!(task_id = %task_id, "no user assigned to task");
            return Ok(None);
        };
        Ok(self.users.find_by_id(user_id).await?)
    }

    /// Requests a task state change on behalf of a caller with `caller`
    /// role.
    ///
    /// Requesting the current state returns the task untouched, even when
    /// that state is terminal. Otherwise terminal targets require the
    /// elevated role, and the transition policy decides the rest.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::Forbidden`], or
    /// [`TaskLifecycleError::Transition`]; nothing is persisted on failure.
    pub async fn request_state_change(
        &self,
        task_id: TaskId,
        requested: TaskState,
        caller: Role,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        let current = task.state();
        if current == requested {
            return Ok(task);
        }

        if let Some(action) = PrivilegedAction::for_transition(requested) {
            authorize(caller, action).inspect_err(|denied| {
                warn!(task_id = %task_id, %denied, "state change refused");
            })?;
        }

        task.transition_to(requested, &*self.clock)
            .inspect_err(|rejection| {
                warn!(task_id = %task_id, %rejection, "incorrect state change");
            })?;
        self.tasks.update(&task).await?;
        info!(task_id = %task_id, from = %current, to = %requested, "task state changed");
        Ok(task)
    }

    /// Assigns a task to a user.
    ///
    /// Any caller may assign an unassigned task; reassigning an assigned
    /// task requires the elevated role.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::Forbidden`], or
    /// [`TaskLifecycleError::UserNotFound`]; nothing is persisted on failure.
    pub async fn assign_user(
        &self,
        task_id: TaskId,
        user_id: UserId,
        caller: Role,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        if task.is_assigned() {
            authorize(caller, PrivilegedAction::Reassignment).inspect_err(|denied| {
                warn!(task_id = %task_id, %denied, "reassignment refused");
            })?;
        }

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "user not found");
            TaskLifecycleError::UserNotFound(user_id)
        })?;

        task.assign_to(user.id(), &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Clears a task's assignee. Any caller may do this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or repository errors when persistence fails.
    pub async fn remove_user(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.unassign(&*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Edits a task's description and/or deadline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Domain`] when a provided field is
    /// invalid.
    pub async fn edit_task(
        &self,
        task_id: TaskId,
        request: EditTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let edit = TaskEdit {
            description: request.description.map(TaskDescription::new).transpose()?,
            deadline: request.deadline,
        };
        let mut task = self.find_task_or_error(task_id).await?;
        task.apply_edit(edit, &*self.clock)?;
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or repository errors when persistence fails.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        if !self.tasks.exists(task_id).await? {
            warn!(task_id = %task_id, "task not found");
            return Err(TaskLifecycleError::TaskNotFound(task_id));
        }
        self.tasks.delete(task_id).await?;
        debug!(task_id = %task_id, "task deleted");
        Ok(())
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks.find_by_id(task_id).await?.ok_or_else(|| {
            warn!(task_id = %task_id, "task not found");
            TaskLifecycleError::TaskNotFound(task_id)
        })
    }
}
