//! Tasktrack: task tracking core with role-gated task lifecycles.
//!
//! This crate provides the decision logic and orchestration behind a task
//! tracking backend: users, tasks, the task state graph, and the rules that
//! govern who may move a task where.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, hashing)
//!
//! # Modules
//!
//! - [`access`]: Caller roles and the privilege gate
//! - [`task`]: Task aggregate, state transitions, and lifecycle service
//! - [`user`]: User accounts, credentials, and the user deletion cascade
//! - [`store`]: Storage adapters implementing both repository ports
//! - [`error`]: Error kind taxonomy shared by all services

pub mod access;
pub mod config;
pub mod error;
pub mod paging;
pub mod store;
pub mod task;
pub mod telemetry;
pub mod user;
