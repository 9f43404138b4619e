//! Persistence gateway for users and dreams.
//!
//! Handlers talk to these traits only; the backing store is picked at startup
//! (PostgreSQL when `DATABASE_URL` is set, otherwise in-memory).

use async_trait::async_trait;
use thiserror::Error;

use dreammap_core::{Dream, DreamChanges, DreamId, NewDream, NewUser, User};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Returned by lookups only. Mutating a missing row is a `Storage` error.
    #[error("not found")]
    NotFound,

    /// Any backend failure, constraint violations included.
    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait DreamStore: Send + Sync {
    async fn list_dreams(&self) -> Result<Vec<Dream>, StoreError>;

    async fn get_dream(&self, id: DreamId) -> Result<Dream, StoreError>;

    /// Insert a dream. The owning user must exist.
    async fn create_dream(&self, dream: NewDream) -> Result<Dream, StoreError>;

    async fn update_dream(&self, id: DreamId, changes: DreamChanges) -> Result<Dream, StoreError>;

    async fn set_dream_done(&self, id: DreamId, done: bool) -> Result<Dream, StoreError>;

    async fn delete_dream(&self, id: DreamId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `Storage` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// A complete backend: both entity stores plus lifecycle.
#[async_trait]
pub trait Store: DreamStore + UserStore {
    /// Release backend resources. Called once at shutdown.
    async fn close(&self) {}
}
