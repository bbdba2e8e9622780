//! In-memory store for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    paging::PageRequest,
    task::{
        domain::{NewTask, Task, TaskId},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
    user::{
        domain::{NewUser, User, UserId, Username},
        ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
    },
};

/// Thread-safe in-memory task and user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    tasks: BTreeMap<TaskId, Task>,
    users: BTreeMap<UserId, User>,
    username_index: HashMap<Username, UserId>,
    last_task_id: i64,
    last_user_id: i64,
}

impl InMemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryStoreState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryStoreState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

fn next_id(last: &mut i64) -> Result<i64, std::io::Error> {
    let next = last
        .checked_add(1)
        .ok_or_else(|| std::io::Error::other("identifier sequence exhausted"))?;
    *last = next;
    Ok(next)
}

fn page_of<'a, V: Clone + 'a>(values: impl Iterator<Item = &'a V>, page: PageRequest) -> Vec<V> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.size()).unwrap_or(usize::MAX);
    values.skip(skip).take(take).cloned().collect()
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn store(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let raw_id = next_id(&mut state.last_task_id).map_err(TaskRepositoryError::persistence)?;
        let id = TaskId::new(raw_id).map_err(TaskRepositoryError::persistence)?;
        let created = task.clone().into_task(id);
        state.tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        if let Some(assignee) = task.assignee()
            && !state.users.contains_key(&assignee)
        {
            return Err(TaskRepositoryError::UnknownAssignee(assignee));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.contains_key(&id))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_assignee(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.assignee() == Some(user))
            .cloned()
            .collect())
    }

    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(page_of(state.tasks.values(), page))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn store(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        if state.username_index.contains_key(user.username()) {
            return Err(UserRepositoryError::DuplicateUsername(
                user.username().clone(),
            ));
        }
        let raw_id = next_id(&mut state.last_user_id).map_err(UserRepositoryError::persistence)?;
        let id = UserId::new(raw_id).map_err(UserRepositoryError::persistence)?;
        let created = user.clone().into_user(id);
        state.username_index.insert(created.username().clone(), id);
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        let old_username = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .username()
            .clone();

        if *user.username() != old_username {
            if let Some(&indexed_id) = state.username_index.get(user.username())
                && indexed_id != user.id()
            {
                return Err(UserRepositoryError::DuplicateUsername(
                    user.username().clone(),
                ));
            }
            state.username_index.remove(&old_username);
            state
                .username_index
                .insert(user.username().clone(), user.id());
        }

        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        let user = state
            .username_index
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn list(&self, page: PageRequest) -> UserRepositoryResult<Vec<User>> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        Ok(page_of(state.users.values(), page))
    }

    async fn delete_releasing_tasks(
        &self,
        id: UserId,
        released_at: DateTime<Utc>,
    ) -> UserRepositoryResult<usize> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        let Some(removed) = state.users.remove(&id) else {
            return Err(UserRepositoryError::NotFound(id));
        };
        state.username_index.remove(removed.username());

        let reset = state
            .tasks
            .values_mut()
            .filter(|task| task.assignee() == Some(id))
            .map(|task| task.release_from_owner(released_at))
            .filter(|was_reset| *was_reset)
            .count();
        Ok(reset)
    }
}
