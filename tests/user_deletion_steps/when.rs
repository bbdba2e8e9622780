//! When steps for user deletion BDD scenarios.

use super::world::{UserDeletionWorld, run_async};
use rstest_bdd_macros::when;
use tasktrack::user::domain::UserId;

#[when("the user is deleted")]
fn the_user_is_deleted(world: &mut UserDeletionWorld) -> Result<(), eyre::Report> {
    let user_id = world.user()?.id();
    world.last_result = Some(run_async(world.users.delete_user(user_id)));
    Ok(())
}

#[when("user {id:i64} is deleted")]
fn user_id_is_deleted(world: &mut UserDeletionWorld, id: i64) -> Result<(), eyre::Report> {
    let user_id = UserId::new(id)?;
    world.last_result = Some(run_async(world.users.delete_user(user_id)));
    Ok(())
}
