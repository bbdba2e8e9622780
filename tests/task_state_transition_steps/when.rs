//! When steps for task state transition BDD scenarios.

use super::world::{TaskTransitionWorld, parse_state, run_async};
use rstest_bdd_macros::when;
use tasktrack::access::Role;

#[when(r#"a "{role}" requests the state "{state}""#)]
fn request_state(
    world: &mut TaskTransitionWorld,
    role: String,
    state: String,
) -> Result<(), eyre::Report> {
    let caller = Role::try_from(role.as_str())
        .map_err(|err| eyre::eyre!("invalid role in scenario: {err}"))?;
    let requested = parse_state(&state)?;
    let task_id = world.task()?.id();

    let result = run_async(
        world
            .service
            .request_state_change(task_id, requested, caller),
    );
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}
