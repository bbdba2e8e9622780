//! Storage adapters for tasks and users.
//!
//! Each adapter implements both [`TaskRepository`](crate::task::ports::TaskRepository)
//! and [`UserRepository`](crate::user::ports::UserRepository) over one
//! backing store, so the user deletion cascade can be written atomically.

pub mod memory;
pub mod postgres;
