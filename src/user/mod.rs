//! User accounts for Tasktrack.
//!
//! Users own tasks through the task assignee relationship. This module
//! covers account creation with hashed credentials, role changes, lookups,
//! and the deletion cascade that puts a removed user's unfinished tasks
//! back into planning. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
