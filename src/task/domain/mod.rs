//! Domain model for task lifecycle management.
//!
//! The task domain models the task aggregate, its seven-state lifecycle
//! graph, and the pure transition policy, keeping all infrastructure
//! concerns outside of the domain boundary.

mod description;
mod error;
mod ids;
mod state;
mod task;

pub use description::TaskDescription;
pub use error::{ParseTaskStateError, TaskDomainError};
pub use ids::TaskId;
pub use state::{TaskState, TransitionRejection, resolve_transition};
pub use task::{NewTask, PersistedTaskData, Task, TaskEdit};
