//! Database adapters (connection pool and migrations wiring).

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;

/// Open a bounded connection pool and bring the schema up to date.
///
/// Migrations are embedded at compile time from `crates/infra/migrations`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}
