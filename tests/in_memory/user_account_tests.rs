//! In-memory integration tests for user account operations.

use super::helpers::{Tracker, cheap_hasher, tracker};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::{
    access::Role,
    error::{Classify, ErrorKind},
    paging::PageRequest,
    user::{
        domain::PlainPassword,
        ports::PasswordHasher,
        services::{CreateUserRequest, UserAccountError},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_users_are_regular_and_hold_a_verifiable_hash(
    tracker: Tracker,
) -> eyre::Result<()> {
    let request = CreateUserRequest::new("ada@example.com", "analytical engine");
    let created = tracker.users.create_user(request).await?;

    ensure!(created.role() == Role::User, "new users are regular users");
    let stored = created.password_hash().as_str();
    ensure!(
        !stored.contains("analytical engine"),
        "plain text is never stored"
    );
    let verified = cheap_hasher().verify(
        &PlainPassword::new("analytical engine")?,
        created.password_hash(),
    )?;
    ensure!(verified, "stored hash verifies the password");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_usernames_conflict(tracker: Tracker) -> eyre::Result<()> {
    tracker.user("grace@example.com", Role::User).await?;

    let result = tracker
        .users
        .create_user(CreateUserRequest::new(" grace@example.com ", "other"))
        .await;

    let Err(UserAccountError::UsernameTaken(name)) = &result else {
        bail!("duplicate accepted: {result:?}");
    };
    ensure!(name.as_str() == "grace@example.com", "name trimmed");
    ensure!(
        result.map_err(|err| err.kind()).err() == Some(ErrorKind::Conflict),
        "classified as conflict"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_are_found_by_username(tracker: Tracker) -> eyre::Result<()> {
    let created = tracker.user("linus@example.com", Role::Admin).await?;

    let found = tracker.users.find_by_username("linus@example.com").await?;
    let missing = tracker.users.find_by_username("nobody@example.com").await?;

    ensure!(
        found.map(|user| user.id()) == Some(created.id()),
        "lookup by username"
    );
    ensure!(missing.is_none(), "unknown usernames are absent");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_role_is_persisted(tracker: Tracker) -> eyre::Result<()> {
    let created = tracker.user("barbara@example.com", Role::User).await?;

    tracker.users.change_role(created.id(), Role::Admin).await?;

    let stored = tracker.users.find_user(created.id()).await?;
    ensure!(stored.role() == Role::Admin, "promotion stored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_users_respects_the_page(tracker: Tracker) -> eyre::Result<()> {
    for index in 0..3 {
        tracker
            .user(&format!("member{index}@example.com"), Role::User)
            .await?;
    }

    let page = tracker.users.list_users(PageRequest::new(1, 2)?).await?;

    ensure!(page.len() == 1, "second page holds the last user");
    ensure!(
        page.iter()
            .all(|user| user.username().as_str() == "member2@example.com"),
        "users ordered by id"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_users_are_not_found(tracker: Tracker) -> eyre::Result<()> {
    let stranger = tasktrack::user::domain::UserId::new(404)?;

    let result = tracker.users.find_user(stranger).await;

    ensure!(
        result.map_err(|err| err.kind()).err() == Some(ErrorKind::NotFound),
        "missing users are not found"
    );
    Ok(())
}
