// src/storage/sqlite.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::LocalStorage;
use crate::error::AppError;

/// SQLite-backed storage: one row per key in the `local_storage` table.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Wraps `pool` and creates the backing table if it does not exist yet.
    pub async fn new(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create local_storage table: {:?}", e);
            AppError::from(e)
        })?;

        Ok(Self { pool })
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO local_storage (key, value)
    VALUES ($1, $2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;

#[async_trait]
impl LocalStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let value =
            sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read '{}': {:?}", key, e);
                    AppError::from(e)
                })?;

        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write '{}': {:?}", key, e);
                AppError::from(e)
            })?;

        Ok(())
    }

    async fn set_items(&self, items: &[(&str, String)]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in items {
            sqlx::query(UPSERT_SQL)
                .bind(*key)
                .bind(value.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to write '{}': {:?}", key, e);
                    AppError::from(e)
                })?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM local_storage WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
