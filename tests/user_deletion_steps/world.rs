//! Shared world state for user deletion BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::Params;
use chrono::{Days, NaiveDate};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use tasktrack::{
    store::memory::InMemoryStore,
    task::{
        domain::{TaskId, TaskState},
        services::TaskLifecycleService,
    },
    user::{
        adapters::Argon2PasswordHasher,
        domain::User,
        services::{UserAccountError, UserAccountService},
    },
};

/// Task service used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryStore, InMemoryStore, DefaultClock>;

/// User service used by the BDD world.
pub type TestUserService =
    UserAccountService<InMemoryStore, InMemoryStore, Argon2PasswordHasher, DefaultClock>;

/// Scenario world for user deletion behaviour tests.
pub struct UserDeletionWorld {
    pub tasks: TestTaskService,
    pub users: TestUserService,
    pub user: Option<User>,
    pub named_tasks: HashMap<String, TaskId>,
    pub last_result: Option<Result<(), UserAccountError>>,
}

impl UserDeletionWorld {
    /// Creates a world whose services share one empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            tasks: TaskLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&clock),
            ),
            users: UserAccountService::new(
                Arc::clone(&store),
                store,
                Arc::new(cheap_hasher()),
                clock,
            ),
            user: None,
            named_tasks: HashMap::new(),
            last_result: None,
        }
    }

    /// Returns the scenario user.
    ///
    /// # Errors
    ///
    /// Returns an error when no user has been created yet.
    pub fn user(&self) -> Result<&User, eyre::Report> {
        self.user
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing user in scenario world"))
    }

    /// Looks up a task created under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when no task carries that name.
    pub fn task_named(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.named_tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task named {name} in scenario world"))
    }
}

impl Default for UserDeletionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> UserDeletionWorld {
    UserDeletionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a state name used in a feature file.
///
/// # Errors
///
/// Returns an error for unknown state names.
pub fn parse_state(name: &str) -> Result<TaskState, eyre::Report> {
    TaskState::try_from(name).map_err(|err| eyre::eyre!("invalid state in scenario: {err}"))
}

/// Legal path from `PLANNED` to `target`.
#[must_use]
pub fn path_to(target: TaskState) -> &'static [TaskState] {
    match target {
        TaskState::Planned => &[],
        TaskState::WorkInProgress => &[TaskState::WorkInProgress],
        TaskState::Postponed => &[TaskState::Postponed],
        TaskState::Notified => &[TaskState::WorkInProgress, TaskState::Notified],
        TaskState::Signed => &[TaskState::WorkInProgress, TaskState::Signed],
        TaskState::Done => &[
            TaskState::WorkInProgress,
            TaskState::Notified,
            TaskState::Done,
        ],
        TaskState::Cancelled => &[TaskState::Cancelled],
    }
}

/// A date one week after today.
#[must_use]
pub fn next_week() -> NaiveDate {
    DefaultClock
        .utc()
        .date_naive()
        .checked_add_days(Days::new(7))
        .unwrap_or(NaiveDate::MAX)
}

/// Argon2id hasher with minimal costs so scenarios stay fast.
#[must_use]
pub fn cheap_hasher() -> Argon2PasswordHasher {
    Params::new(64, 1, 1, None).map_or_else(
        |_| Argon2PasswordHasher::default(),
        Argon2PasswordHasher::new,
    )
}
