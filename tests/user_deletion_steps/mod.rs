//! Step definitions for user deletion scenarios.

pub mod given;
pub mod when;
pub mod world;
