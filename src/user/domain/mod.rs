//! Domain model for user accounts.

mod credential;
mod error;
mod ids;
mod user;
mod username;

pub use crate::access::Role;
pub use credential::{PasswordHash, PlainPassword};
pub use error::UserDomainError;
pub use ids::UserId;
pub use user::{NewUser, PersistedUserData, User};
pub use username::Username;
