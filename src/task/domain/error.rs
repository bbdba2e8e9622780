//! Error types for task domain validation and parsing.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or editing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The deadline lies before the current date.
    #[error("task deadline {deadline} is in the past (today is {today})")]
    DeadlineInPast {
        /// Requested deadline.
        deadline: NaiveDate,
        /// Current date according to the service clock.
        today: NaiveDate,
    },
}

/// Error returned while parsing task states from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
