//! Unit tests for the user account context.
