//! # Key-Value Repository
//!
//! Stores string values in the `kv_store` table.
//!
//! ## Write Semantics
//! `set` is a single upsert statement, so each save is atomic on its own.
//! Two saves issued back to back are independent statements; whichever
//! commits last is what the next startup reads.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::kv::KeyValueStore;

/// `KeyValueStore` over the SQLite `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Creates a new SqliteKeyValueStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteKeyValueStore { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "Read key");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Wrote key");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    async fn test_store() -> (Database, SqliteKeyValueStore) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        (db, kv)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (_db, kv) = test_store().await;
        assert_eq!(kv.get("counters_data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (_db, kv) = test_store().await;

        kv.set("counters_data", r#"[{"id":1,"name":"Default","count":0}]"#)
            .await
            .unwrap();
        kv.set("counters_data", r#"[{"id":1,"name":"Default","count":1}]"#)
            .await
            .unwrap();

        assert_eq!(
            kv.get("counters_data").await.unwrap().as_deref(),
            Some(r#"[{"id":1,"name":"Default","count":1}]"#)
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (_db, kv) = test_store().await;
        kv.set("a", "1").await.unwrap();
        kv.set("b", "2").await.unwrap();

        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(kv.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().set("counters_data", "[]").await.unwrap();
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            db.kv().get("counters_data").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_closed_pool_fails() {
        let (db, kv) = test_store().await;
        db.close().await;

        let err = kv.set("k", "v").await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
