/// In-memory storage backends
///
/// Each store is a map behind a single `parking_lot::RwLock`, giving one
/// writer at a time per store. Nothing survives a restart.

use super::{StoreError, StoreResult, TenantRepository, UserStore};
use crate::models::{
    user::{normalize_email, User},
    TenantScoped,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Record plus its insertion sequence number
struct Entry<T> {
    seq: u64,
    record: T,
}

struct Inner<T> {
    next_seq: u64,
    records: HashMap<Uuid, Entry<T>>,
}

/// Process-local [`TenantRepository`]
pub struct MemoryRepository<T> {
    /// Store name, used in log fields
    name: &'static str,
    inner: RwLock<Inner<T>>,
}

impl<T> MemoryRepository<T> {
    /// Creates an empty repository
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Inner {
                next_seq: 0,
                records: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl<T: TenantScoped> TenantRepository<T> for MemoryRepository<T> {
    async fn insert(&self, record: T) -> StoreResult<()> {
        let id = record.id();
        let mut inner = self.inner.write();

        if inner.records.contains_key(&id) {
            return Err(StoreError::Conflict(format!("{} id {}", self.name, id)));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.insert(id, Entry { seq, record });

        tracing::trace!(store = self.name, id = %id, "Record inserted");
        Ok(())
    }

    async fn update(&self, record: T) -> StoreResult<()> {
        let id = record.id();
        let mut inner = self.inner.write();

        match inner.records.get_mut(&id) {
            Some(entry) => {
                entry.record = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> StoreResult<Option<T>> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .get(&id)
            .map(|entry| &entry.record)
            .filter(|record| record.tenant_id() == tenant_id)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let inner = self.inner.read();
        Ok(inner.records.get(&id).map(|entry| entry.record.clone()))
    }

    async fn list(&self, tenant_id: Uuid) -> StoreResult<Vec<T>> {
        let inner = self.inner.read();
        let mut entries: Vec<&Entry<T>> = inner
            .records
            .values()
            .filter(|entry| entry.record.tenant_id() == tenant_id)
            .collect();
        entries.sort_by_key(|entry| entry.seq);

        Ok(entries.into_iter().map(|entry| entry.record.clone()).collect())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().records.len())
    }
}

/// Process-local [`UserStore`]
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Creates an empty user store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> StoreResult<()> {
        let key = normalize_email(&user.email);
        let mut users = self.users.write();

        if users.contains_key(&key) {
            return Err(StoreError::Conflict(format!("email {}", key)));
        }

        users.insert(key, user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(&normalize_email(email)).cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.users.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::integration::Integration;
    use crate::models::user::UserRole;
    use std::sync::Arc;

    fn user(email: &str) -> User {
        User::new(
            Uuid::new_v4(),
            email,
            "hash".to_string(),
            "Test".to_string(),
            "User".to_string(),
            Uuid::new_v4(),
            UserRole::Admin,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_scoped_by_tenant() {
        let repo = MemoryRepository::new("integrations");
        let tenant = Uuid::new_v4();
        let other = Uuid::new_v4();
        let integration = Integration::connected(Uuid::new_v4(), tenant, "stripe");
        let id = integration.id;

        repo.insert(integration).await.unwrap();

        assert!(repo.get(tenant, id).await.unwrap().is_some());
        assert!(repo.get(other, id).await.unwrap().is_none());
        assert!(repo.find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_conflicts() {
        let repo = MemoryRepository::new("integrations");
        let integration = Integration::connected(Uuid::new_v4(), Uuid::new_v4(), "stripe");

        repo.insert(integration.clone()).await.unwrap();
        let err = repo.insert(integration).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_requires_existing_record() {
        let repo = MemoryRepository::new("integrations");
        let mut integration = Integration::connected(Uuid::new_v4(), Uuid::new_v4(), "stripe");

        let err = repo.update(integration.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == integration.id));

        repo.insert(integration.clone()).await.unwrap();
        integration.provider = "shopify".to_string();
        repo.update(integration.clone()).await.unwrap();

        let stored = repo.find_by_id(integration.id).await.unwrap().unwrap();
        assert_eq!(stored.provider, "shopify");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = MemoryRepository::new("integrations");
        let tenant = Uuid::new_v4();

        for provider in ["c", "a", "b"] {
            repo.insert(Integration::connected(Uuid::new_v4(), tenant, provider))
                .await
                .unwrap();
        }
        repo.insert(Integration::connected(Uuid::new_v4(), Uuid::new_v4(), "x"))
            .await
            .unwrap();

        let providers: Vec<String> = repo
            .list(tenant)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.provider)
            .collect();
        assert_eq!(providers, vec!["c", "a", "b"]);
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_user_email_is_case_insensitive() {
        let store = MemoryUserStore::new();
        store.insert(user("Ada@Example.com")).await.unwrap();

        assert!(store.find_by_email("ada@example.com").await.unwrap().is_some());
        let err = store.insert(user("ADA@example.com ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_admit_one_winner() {
        let store = Arc::new(MemoryUserStore::new());

        let attempts = (0..16).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.insert(user("race@example.com")).await })
        });
        let results = futures::future::join_all(attempts).await;

        let successes = results
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(()))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
