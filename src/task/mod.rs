//! Task lifecycle management for Tasktrack.
//!
//! This module creates tasks, edits their fields, assigns them to users, and
//! moves them through the seven-state lifecycle graph. State changes go
//! through the pure transition policy in [`domain`]; driving a task into a
//! terminal state and reassigning an assigned task are gated by
//! [`crate::access::authorize`]. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Storage adapters live in [`crate::store`].

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
