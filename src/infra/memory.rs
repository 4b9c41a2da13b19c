//! In-memory identity store.
//!
//! System-of-record stand-in used by tests and by scaffolded applications
//! before a real database is wired in. All records and both unique indexes
//! live behind a single lock, so the uniqueness check and the insert are
//! one atomic step.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{IdentityRepository, StoreError, StoreResult, UniqueField};
use crate::domain::UserIdentity;

#[derive(Default)]
struct Tables {
    records: HashMap<Uuid, UserIdentity>,
    by_username: HashMap<String, Uuid>,
    by_email: HashMap<String, Uuid>,
}

/// Thread-safe in-memory implementation of [`IdentityRepository`].
#[derive(Default)]
pub struct MemoryIdentityStore {
    inner: RwLock<Tables>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserIdentity>> {
        let tables = self.inner.read().await;
        Ok(tables.records.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserIdentity>> {
        let tables = self.inner.read().await;
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.records.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserIdentity>> {
        let tables = self.inner.read().await;
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.records.get(id))
            .cloned())
    }

    async fn create(&self, identity: UserIdentity) -> StoreResult<UserIdentity> {
        let mut tables = self.inner.write().await;

        // Check and insert under the same write lock: exactly one of two
        // concurrent creates with the same username can get here first.
        if tables.by_username.contains_key(&identity.username) {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }
        if tables.by_email.contains_key(&identity.email) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }

        tables
            .by_username
            .insert(identity.username.clone(), identity.id);
        tables.by_email.insert(identity.email.clone(), identity.id);
        tables.records.insert(identity.id, identity.clone());

        Ok(identity)
    }

    async fn update(&self, identity: UserIdentity) -> StoreResult<UserIdentity> {
        let mut tables = self.inner.write().await;

        let previous = tables
            .records
            .get(&identity.id)
            .cloned()
            .ok_or(StoreError::NotFound)?;

        // Re-key the unique indexes if username or email changed, refusing
        // collisions with other records.
        if previous.username != identity.username {
            if let Some(other) = tables.by_username.get(&identity.username) {
                if *other != identity.id {
                    return Err(StoreError::UniqueViolation(UniqueField::Username));
                }
            }
            tables.by_username.remove(&previous.username);
            tables
                .by_username
                .insert(identity.username.clone(), identity.id);
        }
        if previous.email != identity.email {
            if let Some(other) = tables.by_email.get(&identity.email) {
                if *other != identity.id {
                    return Err(StoreError::UniqueViolation(UniqueField::Email));
                }
            }
            tables.by_email.remove(&previous.email);
            tables.by_email.insert(identity.email.clone(), identity.id);
        }

        tables.records.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<UserIdentity>> {
        let tables = self.inner.read().await;
        let mut all: Vec<UserIdentity> = tables.records.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        let tables = self.inner.read().await;
        Ok(tables.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(username: &str, email: &str) -> UserIdentity {
        UserIdentity::new(
            username.to_string(),
            email.to_string(),
            String::new(),
            String::new(),
            "hash".to_string(),
        )
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = MemoryIdentityStore::new();
        let created = store
            .create(identity("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_name = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let by_email = store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_unique_violation() {
        let store = MemoryIdentityStore::new();
        store
            .create(identity("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = store
            .create(identity("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Username)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryIdentityStore::new();
        store
            .create(identity("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = store
            .create(identity("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Email)
        ));
    }

    #[tokio::test]
    async fn update_rejects_stolen_username() {
        let store = MemoryIdentityStore::new();
        store
            .create(identity("alice", "alice@example.com"))
            .await
            .unwrap();
        let mut bob = store
            .create(identity("bob", "bob@example.com"))
            .await
            .unwrap();

        bob.username = "alice".to_string();
        let err = store.update(bob).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Username)
        ));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = MemoryIdentityStore::new();
        let err = store
            .update(identity("ghost", "ghost@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn list_pages_in_creation_order() {
        let store = MemoryIdentityStore::new();
        for i in 0..5 {
            store
                .create(identity(
                    &format!("user{}", i),
                    &format!("user{}@example.com", i),
                ))
                .await
                .unwrap();
        }

        let page = store.list(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(store.count().await.unwrap(), 5);
    }
}
