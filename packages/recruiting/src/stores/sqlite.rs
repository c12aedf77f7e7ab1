//! SQLite document store.
//!
//! A file-based durable backend. Good for local development and
//! single-server deployments; per-document atomicity comes from the
//! database, not application-level locking.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::error::StoreError;
use crate::traits::store::DocumentStore;

/// SQLite-backed `(collection, doc_id)` → JSON store.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Connect and run migrations.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - in-memory database (ephemeral)
    /// - `sqlite://./talentflow.db?mode=rwc` - create if not exists
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(StoreError::unavailable)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// In-memory database for testing. A single connection, so every
    /// query sees the same database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(StoreError::unavailable)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                doc_id TEXT NOT NULL,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, doc_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND doc_id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::unavailable)?;

        match row {
            Some(row) => {
                let body: String = row.get("body");
                let doc =
                    serde_json::from_str(&body).map_err(|e| StoreError::Corrupt {
                        collection: collection.to_string(),
                        id: id.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let body = doc.to_string();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_id, body, updated_at)
            VALUES (?, ?, ?, datetime('now'))
            ON CONFLICT (collection, doc_id)
            DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc_id, body FROM documents WHERE collection = ? ORDER BY doc_id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("doc_id");
            let body: String = row.get("body");
            let doc = serde_json::from_str(&body).map_err(|e| StoreError::Corrupt {
                collection: collection.to_string(),
                id: id.clone(),
                reason: e.to_string(),
            })?;
            listed.push((id, doc));
        }
        Ok(listed)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = ? AND doc_id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::unavailable)?;
        Ok(())
    }
}
