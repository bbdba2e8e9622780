//! Step definitions for task state transition scenarios.

pub mod when;
