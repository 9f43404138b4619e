//! In-memory store for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use dreammap_core::{Dream, DreamChanges, DreamId, Entity, NewDream, NewUser, User};

use super::{DreamStore, Store, StoreError, UserStore};

/// Rows keyed by id, with a monotonic id sequence like `BIGSERIAL`.
#[derive(Debug)]
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    last_id: i64,
}

impl<T: Entity> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> T::Id {
        self.last_id += 1;
        T::Id::from(self.last_id)
    }

    fn insert(&mut self, row: T) {
        self.rows.insert(row.id(), row);
    }
}

#[derive(Debug)]
struct Tables {
    users: Table<User>,
    dreams: Table<Dream>,
}

/// Process-local backend with the same observable behaviour as PostgreSQL:
/// unique emails, dream owners must exist, ids are never reused.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables {
                users: Table::new(),
                dreams: Table::new(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".into()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_dream(id: DreamId) -> StoreError {
    StoreError::Storage(format!("no dream with id {id}"))
}

#[async_trait]
impl DreamStore for InMemoryStore {
    async fn list_dreams(&self) -> Result<Vec<Dream>, StoreError> {
        Ok(self.read()?.dreams.rows.values().cloned().collect())
    }

    async fn get_dream(&self, id: DreamId) -> Result<Dream, StoreError> {
        self.read()?
            .dreams
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_dream(&self, dream: NewDream) -> Result<Dream, StoreError> {
        let mut tables = self.write()?;
        if !tables.users.rows.contains_key(&dream.user_id) {
            return Err(StoreError::Storage(format!(
                "dream owner {} does not exist",
                dream.user_id
            )));
        }
        let id = tables.dreams.next_id();
        let dream = dream.into_dream(id);
        tables.dreams.insert(dream.clone());
        Ok(dream)
    }

    async fn update_dream(&self, id: DreamId, changes: DreamChanges) -> Result<Dream, StoreError> {
        let mut tables = self.write()?;
        let dream = tables.dreams.rows.get_mut(&id).ok_or_else(|| missing_dream(id))?;
        changes.apply_to(dream);
        Ok(dream.clone())
    }

    async fn set_dream_done(&self, id: DreamId, done: bool) -> Result<Dream, StoreError> {
        let mut tables = self.write()?;
        let dream = tables.dreams.rows.get_mut(&id).ok_or_else(|| missing_dream(id))?;
        dream.done = done;
        Ok(dream.clone())
    }

    async fn delete_dream(&self, id: DreamId) -> Result<(), StoreError> {
        self.write()?
            .dreams
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing_dream(id))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.rows.values().any(|u| u.email == user.email) {
            return Err(StoreError::Storage(format!(
                "email {} is already registered",
                user.email
            )));
        }
        let user = User {
            id: tables.users.next_id(),
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

impl Store for InMemoryStore {}

#[cfg(test)]
mod tests {
    use dreammap_core::UserId;

    use super::*;

    async fn seeded() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "a@x.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        (store, user)
    }

    fn new_dream(user_id: UserId, description: &str) -> NewDream {
        NewDream::new(user_id, description.into(), None, None, 1.0, 2.0).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_stored_fields() {
        let (store, user) = seeded().await;
        let created = store.create_dream(new_dream(user.id, "d")).await.unwrap();

        assert_eq!(created.id, DreamId::new(1));
        assert!(!created.done);
        assert_eq!(store.get_dream(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn dream_owner_must_exist() {
        let store = InMemoryStore::new();
        let err = store
            .create_dream(new_dream(UserId::new(99), "d"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.list_dreams().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_storage_error() {
        let (store, _) = seeded().await;
        let err = store
            .create_user(NewUser {
                email: "a@x.com".into(),
                password_hash: "other".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let (store, user) = seeded().await;
        assert_eq!(store.find_user_by_email("a@x.com").await.unwrap(), Some(user));
        assert_eq!(store.find_user_by_email("b@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_dream_lookup_vs_mutation() {
        let store = InMemoryStore::new();
        let id = DreamId::new(7);

        assert_eq!(store.get_dream(id).await, Err(StoreError::NotFound));
        assert!(matches!(
            store.update_dream(id, DreamChanges::default()).await,
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(store.set_dream_done(id, true).await, Err(StoreError::Storage(_))));
        assert!(matches!(store.delete_dream(id).await, Err(StoreError::Storage(_))));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (store, user) = seeded().await;
        let first = store.create_dream(new_dream(user.id, "a")).await.unwrap();
        store.delete_dream(first.id).await.unwrap();
        let second = store.create_dream(new_dream(user.id, "b")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.get_dream(first.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let (store, user) = seeded().await;
        for d in ["a", "b", "c"] {
            store.create_dream(new_dream(user.id, d)).await.unwrap();
        }
        let descriptions: Vec<_> = store
            .list_dreams()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.description)
            .collect();
        assert_eq!(descriptions, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn set_done_is_idempotent() {
        let (store, user) = seeded().await;
        let dream = store.create_dream(new_dream(user.id, "d")).await.unwrap();

        let once = store.set_dream_done(dream.id, true).await.unwrap();
        let twice = store.set_dream_done(dream.id, true).await.unwrap();
        assert!(once.done);
        assert_eq!(once, twice);
    }
}
