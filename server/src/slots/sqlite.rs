//! Durable slots in SQLite.

use super::{SlotError, SlotStore};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

/// Slot storage backed by the `slots` table.
#[derive(Debug, Clone)]
pub struct SqliteSlots {
    pool: SqlitePool,
}

impl SqliteSlots {
    /// Connect to the database and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self, SlotError> {
        // Every connection to an in-memory database is its own database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!("Running slot migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing, already migrated pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for SqliteSlots {
    async fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        sqlx::query(
            r#"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(key = %key, bytes = value.len(), "Slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SlotError> {
        sqlx::query("DELETE FROM slots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_is_last_write_wins() {
        let slots = SqliteSlots::connect("sqlite::memory:").await.unwrap();

        assert_eq!(slots.get("quotes").await.unwrap(), None);

        slots.set("quotes", "[]").await.unwrap();
        slots
            .set("quotes", r#"[{"text":"A","category":"B"}]"#)
            .await
            .unwrap();

        assert_eq!(
            slots.get("quotes").await.unwrap().as_deref(),
            Some(r#"[{"text":"A","category":"B"}]"#)
        );

        slots.remove("quotes").await.unwrap();
        assert_eq!(slots.get("quotes").await.unwrap(), None);
    }
}
