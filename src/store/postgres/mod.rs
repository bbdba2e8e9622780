//! `PostgreSQL` store for tasks and users.
//!
//! Diesel is synchronous, so every query runs on the blocking thread pool
//! with a connection checked out of an r2d2 pool.

mod models;
mod schema;
mod tasks;
mod users;

use crate::{task::ports::TaskRepositoryError, user::ports::UserRepositoryError};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by [`PostgresStore`].
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task and user store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: TrackerPgPool,
}

impl PostgresStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_persistence)?
    }
}

/// Repository errors that can wrap an infrastructure failure.
trait PersistenceFailure: Sized {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for UserRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

fn page_bounds(page: crate::paging::PageRequest) -> Result<(i64, i64), std::num::TryFromIntError> {
    Ok((i64::from(page.size()), i64::try_from(page.offset())?))
}
