//! Application services for user accounts.

mod account;

pub use account::{CreateUserRequest, UserAccountError, UserAccountResult, UserAccountService};
