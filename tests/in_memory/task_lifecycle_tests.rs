//! In-memory integration tests for task lifecycle operations.

use super::helpers::{Tracker, next_week, tracker, yesterday};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::{
    access::Role,
    error::{Classify, ErrorKind},
    paging::PageRequest,
    task::{
        domain::{TaskState, TransitionRejection},
        services::{CreateTaskRequest, EditTaskRequest, TaskLifecycleError},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn regular_and_admin_callers_walk_a_task_to_done(tracker: Tracker) -> eyre::Result<()> {
    let task = tracker.task("Migrate billing tables").await?;
    ensure!(task.state() == TaskState::Planned, "tasks start planned");

    let started = tracker
        .tasks
        .request_state_change(task.id(), TaskState::WorkInProgress, Role::User)
        .await?;
    ensure!(started.state() == TaskState::WorkInProgress, "started");

    let user_done = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Done, Role::User)
        .await;
    ensure!(
        matches!(user_done, Err(TaskLifecycleError::Forbidden(_))),
        "regular users cannot finish tasks"
    );

    let skipped = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Done, Role::Admin)
        .await;
    ensure!(
        skipped.as_ref().map_err(Classify::kind).err() == Some(ErrorKind::IllegalTransition),
        "DONE is not reachable from WORK_IN_PROGRESS"
    );

    tracker
        .tasks
        .request_state_change(task.id(), TaskState::Notified, Role::Admin)
        .await?;
    let done = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Done, Role::Admin)
        .await?;
    ensure!(done.state() == TaskState::Done, "admin finished the task");

    let stored = tracker.tasks.find_task(task.id()).await?;
    ensure!(stored.state() == TaskState::Done, "final state persisted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_change_leaves_the_stored_task_untouched(tracker: Tracker) -> eyre::Result<()> {
    let task = tracker.task("Rotate certificates").await?;

    let result = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Signed, Role::Admin)
        .await;
    let rejection = match result {
        Err(TaskLifecycleError::Transition(rejection)) => rejection,
        other => bail!("expected a rejected transition, got {other:?}"),
    };
    let TransitionRejection::IllegalTransition { allowed, .. } = rejection else {
        bail!("expected an illegal transition, got {rejection:?}");
    };
    ensure!(allowed == TaskState::Planned.reachable(), "allowed set");

    let stored = tracker.tasks.find_task(task.id()).await?;
    ensure!(stored == task, "nothing persisted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_state_request_on_a_finished_task_succeeds(tracker: Tracker) -> eyre::Result<()> {
    let task = tracker.task("Archive old logs").await?;
    let cancelled = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Cancelled, Role::Admin)
        .await?;

    let again = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Cancelled, Role::User)
        .await?;
    ensure!(again == cancelled, "no-op returns the stored task");

    let reopened = tracker
        .tasks
        .request_state_change(task.id(), TaskState::Planned, Role::Admin)
        .await;
    ensure!(
        reopened.as_ref().map_err(Classify::kind).err() == Some(ErrorKind::TerminalState),
        "cancelled tasks stay cancelled"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_moves_the_task_between_owners(tracker: Tracker) -> eyre::Result<()> {
    let first = tracker.user("first@example.com", Role::User).await?;
    let second = tracker.user("second@example.com", Role::User).await?;
    let task = tracker.task("Review pull requests").await?;

    tracker
        .tasks
        .assign_user(task.id(), first.id(), Role::User)
        .await?;
    let refused = tracker
        .tasks
        .assign_user(task.id(), second.id(), Role::User)
        .await;
    ensure!(
        matches!(refused, Err(TaskLifecycleError::Forbidden(_))),
        "regular users cannot reassign"
    );

    tracker
        .tasks
        .assign_user(task.id(), second.id(), Role::Admin)
        .await?;

    let first_tasks = tracker.users.find_user_tasks(first.id()).await?;
    let second_tasks = tracker.users.find_user_tasks(second.id()).await?;
    ensure!(first_tasks.is_empty(), "previous owner released");
    ensure!(
        second_tasks.iter().map(|owned| owned.id()).eq([task.id()]),
        "new owner holds the task"
    );

    let assignee = tracker.tasks.find_assignee(task.id()).await?;
    ensure!(
        assignee.map(|user| user.id()) == Some(second.id()),
        "assignee lookup agrees"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_user_unassigns_for_any_caller(tracker: Tracker) -> eyre::Result<()> {
    let owner = tracker.user("owner@example.com", Role::User).await?;
    let task = tracker.task("Draft the roadmap").await?;
    tracker
        .tasks
        .assign_user(task.id(), owner.id(), Role::User)
        .await?;

    let released = tracker.tasks.remove_user(task.id()).await?;

    ensure!(released.assignee().is_none(), "assignee cleared");
    ensure!(
        tracker.users.find_user_tasks(owner.id()).await?.is_empty(),
        "owner collection is empty"
    );
    ensure!(
        tracker.tasks.find_assignee(task.id()).await?.is_none(),
        "no assignee reported"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_a_past_deadline(tracker: Tracker) {
    let result = tracker
        .tasks
        .create_task(CreateTaskRequest::new("Too late", yesterday()))
        .await;

    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(ErrorKind::Validation)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_task_updates_description_and_deadline(tracker: Tracker) -> eyre::Result<()> {
    let task = tracker.task("Initial wording").await?;
    let later = next_week()
        .succ_opt()
        .ok_or_else(|| eyre::eyre!("date out of range"))?;

    let edited = tracker
        .tasks
        .edit_task(
            task.id(),
            EditTaskRequest::new()
                .with_description("Final wording")
                .with_deadline(later),
        )
        .await?;

    ensure!(edited.description().as_str() == "Final wording", "changed");
    ensure!(edited.deadline() == later, "deadline changed");
    let stored = tracker.tasks.find_task(task.id()).await?;
    ensure!(stored == edited, "edit persisted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_removes_it_and_reports_missing_tasks(tracker: Tracker) -> eyre::Result<()> {
    let task = tracker.task("Temporary").await?;

    tracker.tasks.delete_task(task.id()).await?;

    let lookup = tracker.tasks.find_task(task.id()).await;
    ensure!(
        matches!(lookup, Err(TaskLifecycleError::TaskNotFound(_))),
        "deleted task is gone"
    );
    let second_delete = tracker.tasks.delete_task(task.id()).await;
    ensure!(
        matches!(second_delete, Err(TaskLifecycleError::TaskNotFound(_))),
        "deleting twice is not found"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_tasks_pages_in_id_order(tracker: Tracker) -> eyre::Result<()> {
    let mut created = Vec::new();
    for index in 0..5 {
        created.push(tracker.task(&format!("Task {index}")).await?.id());
    }

    let first = tracker.tasks.list_tasks(PageRequest::new(0, 2)?).await?;
    let last = tracker.tasks.list_tasks(PageRequest::new(2, 2)?).await?;
    let beyond = tracker.tasks.list_tasks(PageRequest::new(3, 2)?).await?;

    let first_ids: Vec<_> = first.iter().map(|task| task.id()).collect();
    let last_ids: Vec<_> = last.iter().map(|task| task.id()).collect();
    ensure!(first_ids == created[..2], "first page holds the oldest");
    ensure!(last_ids == created[4..], "last page holds the remainder");
    ensure!(beyond.is_empty(), "pages past the end are empty");
    Ok(())
}
