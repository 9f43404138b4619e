//! Postgres-backed store implementation.
//!
//! ## Error Mapping
//!
//! Every SQLx error becomes `StoreError::Storage` with the operation name
//! attached. Known constraint codes get a readable message:
//!
//! | PostgreSQL Error Code | Scenario |
//! |----------------------|----------|
//! | `23505` | Email already registered (unique violation) |
//! | `23503` | Dream owner does not exist (foreign key violation) |
//!
//! `image_path` and `street_view_image` carry a set flag next to the value so
//! an update can clear them; the other columns keep their value on `NULL`.
//!
//! A missing row is `StoreError::NotFound` for `get_dream` and a storage error
//! for update/delete, matching how the HTTP contract reports them.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use dreammap_core::{Dream, DreamChanges, DreamId, NewDream, NewUser, User, UserId};

use super::{DreamStore, Store, StoreError, UserStore};

const DREAM_COLUMNS: &str =
    "id, description, image_path, street_view_image, latitude, longitude, done, user_id";

/// Postgres-backed store for users and dreams.
///
/// `PgPool` is internally reference counted, so the store is cheap to clone
/// and safe to share across request tasks.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DreamRow {
    id: i64,
    description: String,
    image_path: Option<String>,
    street_view_image: Option<String>,
    latitude: f64,
    longitude: f64,
    done: bool,
    user_id: i64,
}

impl From<DreamRow> for Dream {
    fn from(row: DreamRow) -> Self {
        Self {
            id: DreamId::new(row.id),
            description: row.description,
            image_path: row.image_path,
            street_view_image: row.street_view_image,
            latitude: row.latitude,
            longitude: row.longitude,
            done: row.done,
            user_id: UserId::new(row.user_id),
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            password_hash: row.password,
        }
    }
}

fn missing_dream(id: DreamId) -> StoreError {
    StoreError::Storage(format!("no dream with id {id}"))
}

#[async_trait]
impl DreamStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn list_dreams(&self) -> Result<Vec<Dream>, StoreError> {
        let rows: Vec<DreamRow> =
            sqlx::query_as(&format!("SELECT {DREAM_COLUMNS} FROM dreams ORDER BY id ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list_dreams", e))?;
        Ok(rows.into_iter().map(Dream::from).collect())
    }

    #[instrument(skip(self), fields(dream_id = %id), err)]
    async fn get_dream(&self, id: DreamId) -> Result<Dream, StoreError> {
        let row: Option<DreamRow> =
            sqlx::query_as(&format!("SELECT {DREAM_COLUMNS} FROM dreams WHERE id = $1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("get_dream", e))?;
        row.map(Dream::from).ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, dream), fields(user_id = %dream.user_id), err)]
    async fn create_dream(&self, dream: NewDream) -> Result<Dream, StoreError> {
        let row: DreamRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO dreams (description, image_path, street_view_image, latitude, longitude, done, user_id)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING {DREAM_COLUMNS}
            "#
        ))
        .bind(&dream.description)
        .bind(&dream.image_path)
        .bind(&dream.street_view_image)
        .bind(dream.latitude)
        .bind(dream.longitude)
        .bind(dream.user_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_dream", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self, changes), fields(dream_id = %id), err)]
    async fn update_dream(&self, id: DreamId, changes: DreamChanges) -> Result<Dream, StoreError> {
        let row: Option<DreamRow> = sqlx::query_as(&format!(
            r#"
            UPDATE dreams SET
                description = COALESCE($2, description),
                image_path = CASE WHEN $3 THEN $4 ELSE image_path END,
                street_view_image = CASE WHEN $5 THEN $6 ELSE street_view_image END,
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude)
            WHERE id = $1
            RETURNING {DREAM_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(&changes.description)
        .bind(changes.image_path.is_some())
        .bind(changes.image_path.clone().flatten())
        .bind(changes.street_view_image.is_some())
        .bind(changes.street_view_image.clone().flatten())
        .bind(changes.latitude)
        .bind(changes.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_dream", e))?;
        row.map(Dream::from).ok_or_else(|| missing_dream(id))
    }

    #[instrument(skip(self), fields(dream_id = %id), err)]
    async fn set_dream_done(&self, id: DreamId, done: bool) -> Result<Dream, StoreError> {
        let row: Option<DreamRow> = sqlx::query_as(&format!(
            "UPDATE dreams SET done = $2 WHERE id = $1 RETURNING {DREAM_COLUMNS}"
        ))
        .bind(id.get())
        .bind(done)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("set_dream_done", e))?;
        row.map(Dream::from).ok_or_else(|| missing_dream(id))
    }

    #[instrument(skip(self), fields(dream_id = %id), err)]
    async fn delete_dream(&self, id: DreamId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM dreams WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_dream", e))?;
        if result.rows_affected() == 0 {
            return Err(missing_dream(id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self, user), fields(email = %user.email), err)]
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id, email, password",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, email, password FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let detail = match db_err.code().as_deref() {
                Some("23505") => "unique constraint violated",
                Some("23503") => "referenced row does not exist",
                _ => "database error",
            };
            StoreError::Storage(format!("{detail} in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Storage(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Storage(format!("timed out acquiring a connection in {operation}"))
        }
        other => StoreError::Storage(format!("{operation}: {other}")),
    }
}
