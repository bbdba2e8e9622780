//! Task repository queries.

use super::{
    PostgresStore,
    models::{NewTaskRow, TaskRow},
    page_bounds,
    schema::tasks,
};
use crate::{
    paging::PageRequest,
    task::{
        domain::{NewTask, PersistedTaskData, Task, TaskDescription, TaskId, TaskState},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
    user::domain::UserId,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

#[async_trait]
impl TaskRepository for PostgresStore {
    async fn store(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(task);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task = task.clone();
        self.run_blocking(move |connection| {
            let assignee = task.assignee();
            let updated = diesel::update(tasks::table.find(task.id().value()))
                .set((
                    tasks::description.eq(task.description().as_str()),
                    tasks::deadline.eq(task.deadline()),
                    tasks::state.eq(task.state().as_str()),
                    tasks::assignee_id.eq(assignee.map(UserId::value)),
                    tasks::updated_at.eq(task.updated_at()),
                ))
                .execute(connection)
                .map_err(|err| match (err, assignee) {
                    (
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _),
                        Some(user),
                    ) => TaskRepositoryError::UnknownAssignee(user),
                    (other, _) => TaskRepositoryError::persistence(other),
                })?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task.id()));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(tasks::table.find(id.value())))
                .get_result::<bool>(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.value()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_assignee(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::assignee_id.eq(user.value()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        let (limit, offset) = page_bounds(page).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            tasks::table
                .order(tasks::id.asc())
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }
}

fn to_new_row(task: &NewTask) -> NewTaskRow {
    NewTaskRow {
        description: task.description().as_str().to_owned(),
        deadline: task.deadline(),
        state: TaskState::Planned.as_str().to_owned(),
        assignee_id: None,
        created_at: task.created_at(),
        updated_at: task.created_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        description,
        deadline,
        state,
        assignee_id,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::invalid_persisted_data)?,
        description: TaskDescription::new(description)
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        deadline,
        state: TaskState::try_from(state.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        assignee: assignee_id
            .map(UserId::new)
            .transpose()
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
