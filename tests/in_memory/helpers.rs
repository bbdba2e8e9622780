//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use argon2::Params;
use chrono::{Days, NaiveDate};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use tasktrack::{
    access::Role,
    store::memory::InMemoryStore,
    task::{
        domain::Task,
        services::{CreateTaskRequest, TaskLifecycleService},
    },
    user::{
        adapters::Argon2PasswordHasher,
        domain::User,
        services::{CreateUserRequest, UserAccountService},
    },
};

/// Task service wired to the in-memory store.
pub type Tasks = TaskLifecycleService<InMemoryStore, InMemoryStore, DefaultClock>;

/// User service wired to the in-memory store.
pub type Users =
    UserAccountService<InMemoryStore, InMemoryStore, Argon2PasswordHasher, DefaultClock>;

/// Both services sharing one store.
pub struct Tracker {
    pub tasks: Tasks,
    pub users: Users,
}

impl Tracker {
    /// Wires both services over a fresh store.
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
        }
    }

    /// Creates a task due next week.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be created.
    pub async fn task(&self, description: &str) -> eyre::Result<Task> {
        Ok(self
            .tasks
            .create_task(CreateTaskRequest::new(description, next_week()))
            .await?)
    }

    /// Creates a user with the given role.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be created or promoted.
    pub async fn user(&self, username: &str, role: Role) -> eyre::Result<User> {
        let created = self
            .users
            .create_user(CreateUserRequest::new(username, "correct horse"))
            .await?;
        Ok(self.users.change_role(created.id(), role).await?)
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Provides a fresh tracker for each test.
#[fixture]
pub fn tracker() -> Tracker {
    Tracker::new()
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

/// The day before today.
#[must_use]
pub fn yesterday() -> NaiveDate {
    DefaultClock
        .utc()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .unwrap_or(NaiveDate::MIN)
}

/// Argon2id hasher with minimal costs so tests stay fast.
#[must_use]
pub fn cheap_hasher() -> Argon2PasswordHasher {
    Params::new(64, 1, 1, None).map_or_else(
        |_| Argon2PasswordHasher::default(),
        Argon2PasswordHasher::new,
    )
}
