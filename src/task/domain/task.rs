//! Task aggregate root and related task lifecycle types.

use super::{TaskDescription, TaskDomainError, TaskId, TaskState, TransitionRejection};
use crate::user::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// The assignee is the single record of the task-to-user relationship; a
/// user's task collection is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: TaskDescription,
    deadline: NaiveDate,
    state: TaskState,
    assignee: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated task that has not been given an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    description: TaskDescription,
    deadline: NaiveDate,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted deadline.
    pub deadline: NaiveDate,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Persisted assignee, if any.
    pub assignee: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field changes for a simple task edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement deadline.
    pub deadline: Option<NaiveDate>,
}

impl NewTask {
    /// Validates the fields of a task about to be created.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineInPast`] when `deadline` is before
    /// the clock's current date.
    pub fn new(
        description: TaskDescription,
        deadline: NaiveDate,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let created_at = clock.utc();
        ensure_not_past(deadline, created_at)?;
        Ok(Self {
            description,
            deadline,
            created_at,
        })
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Turns the draft into a `Planned`, unassigned task with the
    /// store-assigned identifier.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            description: self.description,
            deadline: self.deadline,
            state: TaskState::Planned,
            assignee: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            deadline: data.deadline,
            state: data.state,
            assignee: data.assignee,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    /// Returns the task lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns `true` when a user is assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assignee.is_some()
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

    /// Moves the task to `requested` if the transition graph allows it.
    ///
    /// # Errors
    ///
    /// Returns the [`TransitionRejection`] from
    /// [`resolve_transition`](super::resolve_transition); the task is left
    /// unchanged.
    pub fn transition_to(
        &mut self,
        requested: TaskState,
        clock: &impl Clock,
    ) -> Result<(), TransitionRejection> {
        self.state = super::resolve_transition(self.state, requested)?;
        self.touch(clock);
        Ok(())
    }

    /// Detaches the task from its deleted owner.
    ///
    /// The assignee is always cleared. A non-terminal task is also put back
    /// to `Planned`, bypassing the transition graph, and stamped with
    /// `released_at`; a terminal task keeps its state and timestamps.
    ///
    /// Returns `true` when the state was reset.
    pub fn release_from_owner(&mut self, released_at: DateTime<Utc>) -> bool {
        self.assignee = None;
        if self.state.is_terminal() {
            return false;
        }
        self.state = TaskState::Planned;
        self.updated_at = released_at;
        true
    }

    /// Assigns the task to `user`, replacing any previous assignee.
    pub fn assign_to(&mut self, user: UserId, clock: &impl Clock) {
        self.assignee = Some(user);
        self.touch(clock);
    }

    /// Clears the assignee.
    pub fn unassign(&mut self, clock: &impl Clock) {
        self.assignee = None;
        self.touch(clock);
    }

    /// Applies a simple field edit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineInPast`] when a new deadline lies
    /// before the clock's current date; no field is changed in that case.
    pub fn apply_edit(
        &mut self,
        edit: TaskEdit,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        if let Some(deadline) = edit.deadline {
            ensure_not_past(deadline, now)?;
            self.deadline = deadline;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        self.updated_at = now;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn ensure_not_past(deadline: NaiveDate, now: DateTime<Utc>) -> Result<(), TaskDomainError> {
    let today = now.date_naive();
    if deadline < today {
        return Err(TaskDomainError::DeadlineInPast { deadline, today });
    }
    Ok(())
}
