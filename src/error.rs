//! Error kind taxonomy shared by every service.
//!
//! Services keep their own `thiserror` enums. The request layer only needs
//! to know which [`ErrorKind`] a failure belongs to in order to pick a
//! transport-level response, so each service error implements [`Classify`].

use serde::Serialize;
use std::fmt;

/// Category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced task or user does not exist.
    NotFound,
    /// The caller's role does not permit the action.
    Forbidden,
    /// The requested task state is not reachable from the current one.
    IllegalTransition,
    /// The task is in a state with no outbound transitions.
    TerminalState,
    /// A uniqueness constraint was violated.
    Conflict,
    /// Input to a creation or edit call was malformed.
    Validation,
    /// The storage layer failed unexpectedly.
    Storage,
}

impl ErrorKind {
    /// Returns the canonical name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::IllegalTransition => "illegal_transition",
            Self::TerminalState => "terminal_state",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Storage => "storage",
        }
    }

    /// Returns `true` when the failure is caused by the caller's request
    /// rather than by the storage layer.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Storage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an error onto the shared [`ErrorKind`] taxonomy.
pub trait Classify {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}
