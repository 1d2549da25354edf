use crate::ports::snapshot_store::{Result, SnapshotStore as SnapshotStoreTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of SnapshotStore
///
/// Stores each named blob as a single row in the `snapshots` table.
/// Writes replace the whole row (last write wins).
pub struct SnapshotStore {
    pool: PgPool,
}

impl SnapshotStore {
    /// Create a new SnapshotStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[async_trait]
impl SnapshotStoreTrait for SnapshotStore {
    /// Load the blob stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let row = sqlx::query(
            r#"
            SELECT data
            FROM snapshots
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.get::<Vec<u8>, _>("data")))
    }

    /// Upsert the blob stored under `key`
    ///
    /// Uses INSERT ... ON CONFLICT so the first write and every later write
    /// go through the same statement.
    async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO snapshots (key, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key)
            DO UPDATE SET
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
