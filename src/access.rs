//! Caller roles and the privilege gate.
//!
//! Every role-dependent decision in the crate goes through [`authorize`].
//! Services describe what the caller is attempting as a
//! [`PrivilegedAction`] and let the gate decide.

use crate::task::domain::TaskState;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Role of an authenticated caller or stored user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator, the elevated role.
    Admin,
}

impl Role {
    /// Returns `true` for the elevated role.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "u",
            Self::Admin => "a",
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "u" | "user" => Ok(Self::User),
            "a" | "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Action that only the elevated role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegedAction {
    /// Driving a task into a terminal state.
    TerminalTransition(TaskState),
    /// Reassigning a task that already has an assignee.
    Reassignment,
}

impl PrivilegedAction {
    /// Returns the privileged action implied by moving a task to `target`,
    /// or `None` when any caller may request that state.
    #[must_use]
    pub const fn for_transition(target: TaskState) -> Option<Self> {
        match target {
            TaskState::Done | TaskState::Cancelled => Some(Self::TerminalTransition(target)),
            _ => None,
        }
    }
}

impl fmt::Display for PrivilegedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminalTransition(state) => write!(f, "move task to {state}"),
            Self::Reassignment => f.write_str("reassign an assigned task"),
        }
    }
}

/// Rejection produced by the privilege gate.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("role {role} may not {action}")]
pub struct AccessDenied {
    /// Role of the rejected caller.
    pub role: Role,
    /// Action the caller attempted.
    pub action: PrivilegedAction,
}

/// Checks whether `role` may perform `action`.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the role is not elevated.
pub const fn authorize(role: Role, action: PrivilegedAction) -> Result<(), AccessDenied> {
    if role.is_elevated() {
        Ok(())
    } else {
        Err(AccessDenied { role, action })
    }
}
