//! Record Store
//!
//! The durable system of record for users. The store owns identity and email
//! uniqueness; every mutation is committed before the call returns.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewUser, User, UserChanges};

pub const USER_EXISTS: &str = "User already exists";
pub const EMAIL_IN_USE: &str = "Email already in use";

/// Users inserted on first start when the table is empty.
pub const DEFAULT_USERS: [(&str, &str); 3] = [
    ("Ivan Petrov", "ivan@example.com"),
    ("Maria Sidorova", "maria@example.com"),
    ("Alexey Ivanov", "alexey@example.com"),
];

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Repository over user records.
///
/// Implementations check email uniqueness with an explicit lookup before
/// writing, so a duplicate is reported as `StoreError::Conflict` rather than
/// surfacing as a raw constraint violation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `Conflict` if the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Fetches a user by id. Fails with `NotFound`.
    async fn get(&self, id: i64) -> StoreResult<User>;

    /// Returns all users ordered by id.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Applies `changes` to an existing user.
    ///
    /// Fails with `NotFound` for an unknown id, or `Conflict` if the new email
    /// belongs to a different user.
    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User>;

    /// Removes a user. Fails with `NotFound`.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Looks up a user by exact email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Number of stored users.
    async fn count(&self) -> StoreResult<u64>;

    /// Inserts `DEFAULT_USERS` when the store is empty.
    ///
    /// Returns the number of users inserted.
    async fn seed_defaults(&self) -> StoreResult<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }
        for (name, email) in DEFAULT_USERS {
            self.create(NewUser::new(name, email)).await?;
        }
        Ok(DEFAULT_USERS.len())
    }
}

/// Rejects `changes.email` if some other user already owns it.
pub(crate) async fn ensure_email_free_for<S>(
    store: &S,
    id: i64,
    changes: &UserChanges,
) -> StoreResult<()>
where
    S: UserStore + ?Sized,
{
    if let Some(email) = &changes.email {
        if let Some(owner) = store.find_by_email(email).await? {
            if owner.id != id {
                return Err(StoreError::Conflict(EMAIL_IN_USE.to_string()));
            }
        }
    }
    Ok(())
}
