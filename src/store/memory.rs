//! In-memory user store
//!
//! Used by tests and local runs without PostgreSQL. A single write lock covers
//! each mutation, so the uniqueness check and the write are atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StoreResult, UserStore, EMAIL_IN_USE, USER_EXISTS};
use crate::error::StoreError;
use crate::models::{NewUser, User, UserChanges};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    /// Last assigned id; ids are never reused
    last_id: i64,
}

impl Table {
    fn email_owner(&self, email: &str) -> Option<&User> {
        self.rows.values().find(|u| u.email == email)
    }
}

/// `UserStore` backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut table = self.table.write().await;
        if table.email_owner(&user.email).is_some() {
            return Err(StoreError::Conflict(USER_EXISTS.to_string()));
        }

        table.last_id += 1;
        let created = User {
            id: table.last_id,
            name: user.name,
            email: user.email,
        };
        table.rows.insert(created.id, created.clone());
        debug!("Inserted user {}", created.id);
        Ok(created)
    }

    async fn get(&self, id: i64) -> StoreResult<User> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(email) = &changes.email {
            if table.email_owner(email).is_some_and(|owner| owner.id != id) {
                return Err(StoreError::Conflict(EMAIL_IN_USE.to_string()));
            }
        }

        let user = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        changes.apply_to(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.email_owner(email).cloned())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.table.read().await.rows.len() as u64)
    }
}
