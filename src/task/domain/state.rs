//! Task lifecycle states and the transition policy.
//!
//! The reachable set of every state is a compile-time constant, so the graph
//! is identical for all tasks and can never change while the process runs.

use super::ParseTaskStateError;
use crate::error::{Classify, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Task has been created but work has not started.
    Planned,
    /// Task is being worked on.
    WorkInProgress,
    /// Task has been put off.
    Postponed,
    /// Stakeholders have been notified about the task outcome.
    Notified,
    /// Task outcome has been signed off.
    Signed,
    /// Task has been completed.
    Done,
    /// Task has been abandoned.
    Cancelled,
}

impl TaskState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Planned,
        Self::WorkInProgress,
        Self::Postponed,
        Self::Notified,
        Self::Signed,
        Self::Done,
        Self::Cancelled,
    ];

    /// Returns the states this state may transition to.
    #[must_use]
    pub const fn reachable(self) -> &'static [Self] {
        match self {
            Self::Planned => &[Self::WorkInProgress, Self::Postponed, Self::Cancelled],
            Self::WorkInProgress => &[
                Self::WorkInProgress,
                Self::Notified,
                Self::Signed,
                Self::Cancelled,
            ],
            Self::Postponed => &[
                Self::Postponed,
                Self::Notified,
                Self::Signed,
                Self::Cancelled,
            ],
            Self::Notified => &[Self::Signed, Self::Done, Self::Cancelled],
            Self::Signed => &[Self::Notified, Self::Done, Self::Cancelled],
            Self::Done | Self::Cancelled => &[],
        }
    }

    /// Returns `true` when `target` is in this state's reachable set.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.reachable().contains(&target)
    }

    /// Returns `true` when no transition out of this state exists.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.reachable().is_empty()
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "pl",
            Self::WorkInProgress => "wp",
            Self::Postponed => "pp",
            Self::Notified => "nf",
            Self::Signed => "sn",
            Self::Done => "dn",
            Self::Cancelled => "cn",
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::WorkInProgress => "WORK_IN_PROGRESS",
            Self::Postponed => "POSTPONED",
            Self::Notified => "NOTIFIED",
            Self::Signed => "SIGNED",
            Self::Done => "DONE",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    /// Parses either the storage code (`"wp"`) or the display name
    /// (`"WORK_IN_PROGRESS"`), ignoring case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| {
                state.name() == normalized || state.as_str().eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| ParseTaskStateError(value.to_owned()))
    }
}

/// Rejection produced by [`resolve_transition`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionRejection {
    /// The current state has no outbound transitions.
    #[error("task state {state} is final and cannot be changed")]
    TerminalState {
        /// Current, terminal state.
        state: TaskState,
    },

    /// The requested state is not reachable from the current one.
    #[error(
        "task state cannot change from {from} to {to}; allowed states: {}.",
        join_states(.allowed)
    )]
    IllegalTransition {
        /// Current state.
        from: TaskState,
        /// Requested state.
        to: TaskState,
        /// Full reachable set of `from`.
        allowed: &'static [TaskState],
    },
}

fn join_states(states: &[TaskState]) -> String {
    states
        .iter()
        .map(|state| state.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decides the state a task moves to when `requested` is asked for while in
/// `current`.
///
/// Terminal states are checked first, so a terminal state rejects even a
/// request for itself.
///
/// # Errors
///
/// Returns [`TransitionRejection::TerminalState`] when `current` has no
/// outbound transitions, or [`TransitionRejection::IllegalTransition`]
/// carrying the reachable set of `current` when `requested` is not in it.
pub fn resolve_transition(
    current: TaskState,
    requested: TaskState,
) -> Result<TaskState, TransitionRejection> {
    if current.is_terminal() {
        return Err(TransitionRejection::TerminalState { state: current });
    }
    if current.can_transition_to(requested) {
        return Ok(requested);
    }
    Err(TransitionRejection::IllegalTransition {
        from: current,
        to: requested,
        allowed: current.reachable(),
    })
}

impl Classify for TransitionRejection {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::TerminalState { .. } => ErrorKind::TerminalState,
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
        }
    }
}
