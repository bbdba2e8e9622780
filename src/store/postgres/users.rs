//! User repository queries and the user deletion cascade.

use super::{
    PostgresStore,
    models::{NewUserRow, UserRow},
    page_bounds,
    schema::{tasks, users},
};
use crate::{
    access::Role,
    paging::PageRequest,
    task::domain::TaskState,
    user::{
        domain::{NewUser, PasswordHash, PersistedUserData, User, UserId, Username},
        ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl From<DieselError> for UserRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn store(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let username = user.username().clone();
        let new_row = to_new_row(user);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result(connection)
                .map_err(|err| map_unique_violation(err, &username))?;
            row_to_user(row)
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user = user.clone();
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(user.id().value()))
                .set((
                    users::username.eq(user.username().as_str()),
                    users::password_hash.eq(user.password_hash().as_str()),
                    users::role.eq(user.role().as_str()),
                    users::updated_at.eq(user.updated_at()),
                ))
                .execute(connection)
                .map_err(|err| map_unique_violation(err, user.username()))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user.id()));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id.value())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let lookup = username.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Vec<User>> {
        let (limit, offset) = page_bounds(page).map_err(UserRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            users::table
                .order(users::id.asc())
                .limit(limit)
                .offset(offset)
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?
                .into_iter()
                .map(row_to_user)
                .collect()
        })
        .await
    }

    async fn delete_releasing_tasks(
        &self,
        id: UserId,
        released_at: DateTime<Utc>,
    ) -> UserRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| delete_releasing_tasks_in(tx, id, released_at))
        })
        .await
    }
}

fn delete_releasing_tasks_in(
    connection: &mut PgConnection,
    id: UserId,
    released_at: DateTime<Utc>,
) -> UserRepositoryResult<usize> {
    let reset = diesel::update(
        tasks::table
            .filter(tasks::assignee_id.eq(id.value()))
            .filter(tasks::state.ne_all(terminal_state_codes())),
    )
    .set((
        tasks::state.eq(TaskState::Planned.as_str()),
        tasks::updated_at.eq(released_at),
    ))
    .execute(connection)?;

    diesel::update(tasks::table.filter(tasks::assignee_id.eq(id.value())))
        .set(tasks::assignee_id.eq(None::<i64>))
        .execute(connection)?;

    let deleted = diesel::delete(users::table.find(id.value())).execute(connection)?;
    if deleted == 0 {
        return Err(UserRepositoryError::NotFound(id));
    }
    Ok(reset)
}

fn terminal_state_codes() -> Vec<&'static str> {
    TaskState::ALL
        .into_iter()
        .filter(|state| state.is_terminal())
        .map(TaskState::as_str)
        .collect()
}

fn map_unique_violation(err: DieselError, username: &Username) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::DuplicateUsername(username.clone())
        }
        other => UserRepositoryError::persistence(other),
    }
}

fn to_new_row(user: &NewUser) -> NewUserRow {
    NewUserRow {
        username: user.username().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        created_at: user.created_at(),
        updated_at: user.created_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        username,
        password_hash,
        role,
        created_at,
        updated_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::new(id).map_err(UserRepositoryError::invalid_persisted_data)?,
        username: Username::new(username).map_err(UserRepositoryError::invalid_persisted_data)?,
        password_hash: PasswordHash::from_encoded(password_hash),
        role: Role::try_from(role.as_str()).map_err(UserRepositoryError::invalid_persisted_data)?,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
