//! Given steps for user deletion BDD scenarios.

use super::world::{UserDeletionWorld, next_week, parse_state, path_to, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasktrack::{
    access::Role,
    task::services::CreateTaskRequest,
    user::services::CreateUserRequest,
};

#[given(r#"a user "{username}""#)]
fn a_user(world: &mut UserDeletionWorld, username: String) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .users
            .create_user(CreateUserRequest::new(username, "correct horse")),
    )
    .wrap_err("create scenario user")?;
    world.user = Some(created);
    Ok(())
}

#[given(r#"the user owns task "{name}" in state "{state}""#)]
fn user_owns_task(
    world: &mut UserDeletionWorld,
    name: String,
    state: String,
) -> Result<(), eyre::Report> {
    let target = parse_state(&state)?;
    let owner = world.user()?.id();
    let created = run_async(
        world
            .tasks
            .create_task(CreateTaskRequest::new(name.as_str(), next_week())),
    )
    .wrap_err("create scenario task")?;
    run_async(world.tasks.assign_user(created.id(), owner, Role::User))
        .wrap_err("assign scenario task")?;
    for step in path_to(target) {
        run_async(
            world
                .tasks
                .request_state_change(created.id(), *step, Role::Admin),
        )
        .wrap_err("move scenario task")?;
    }
    world.named_tasks.insert(name, created.id());
    Ok(())
}
