//! Adapter implementations for user ports.
//!
//! Repository adapters live in [`crate::store`] because they share storage
//! with tasks.

pub mod hashing;

pub use hashing::Argon2PasswordHasher;
