//! # Key/Value Store
//!
//! The persistent store every collection lives in.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store                                                               │
//! │  ┌──────────────────┬──────────────────────────────┬─────────────────┐  │
//! │  │ key              │ value (JSON text)            │ updated_at      │  │
//! │  ├──────────────────┼──────────────────────────────┼─────────────────┤  │
//! │  │ items            │ [{"id":1,"name":...}, ...]   │ 2024-03-15T...  │  │
//! │  │ stockData        │ [{"itemId":1,...}, ...]      │                 │  │
//! │  │ bills            │ [{"billNumber":"BILL-001"..}]│                 │  │
//! │  │ cart             │ [{"id":4,"quantity":0.5}]    │                 │  │
//! │  │ nextBillSequence │ 8                            │                 │  │
//! │  └──────────────────┴──────────────────────────────┴─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is one statement and is durable when it returns. There is no
//! transaction spanning two keys.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Logical keys of the persisted collections.
pub mod keys {
    pub const ITEMS: &str = "items";
    pub const STOCK: &str = "stockData";
    pub const BILLS: &str = "bills";
    pub const CART: &str = "cart";
    pub const NEXT_BILL_SEQUENCE: &str = "nextBillSequence";
}

/// JSON documents under string keys.
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        KvStore { pool }
    }

    /// Reads and decodes the value under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Reads the JSON text under `key` without decoding it.
    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw).await
    }

    /// Stores JSON text under `key` as is.
    pub async fn set_raw(&self, key: &str, raw: &str) -> DbResult<()> {
        debug!(key = %key, bytes = raw.len(), "Writing key");

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Deleting an absent key is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "Removing key");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes every key.
    pub async fn clear(&self) -> DbResult<()> {
        debug!("Clearing store");

        sqlx::query("DELETE FROM kv_store").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    async fn store() -> KvStore {
        Database::new(DbConfig::in_memory()).await.unwrap().store()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = store().await;
        let value: Option<Vec<u64>> = store.get("nothing").await.unwrap();
        assert!(value.is_none());
        assert!(!store.contains("nothing").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = store().await;
        store.set(keys::NEXT_BILL_SEQUENCE, &8u64).await.unwrap();
        store.set(keys::NEXT_BILL_SEQUENCE, &9u64).await.unwrap();

        let value: Option<u64> = store.get(keys::NEXT_BILL_SEQUENCE).await.unwrap();
        assert_eq!(value, Some(9));
    }

    #[tokio::test]
    async fn test_structured_values_round_trip() {
        let store = store().await;
        let value = serde_json::json!([{"id": 1, "name": "RICE", "rates": [1.5, 2.25]}]);
        store.set(keys::ITEMS, &value).await.unwrap();

        let back: serde_json::Value = store.get(keys::ITEMS).await.unwrap().unwrap();
        assert_eq!(back, value);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = store().await;
        store.set(keys::CART, &Vec::<u64>::new()).await.unwrap();
        store.set(keys::BILLS, &Vec::<u64>::new()).await.unwrap();

        store.remove(keys::CART).await.unwrap();
        store.remove(keys::CART).await.unwrap();
        assert!(!store.contains(keys::CART).await.unwrap());
        assert!(store.contains(keys::BILLS).await.unwrap());

        store.clear().await.unwrap();
        assert!(!store.contains(keys::BILLS).await.unwrap());
    }

    #[tokio::test]
    async fn test_undecodable_value() {
        let store = store().await;
        store.set_raw(keys::ITEMS, "{not json").await.unwrap();

        let result: DbResult<Option<Vec<u64>>> = store.get(keys::ITEMS).await;
        assert!(matches!(result, Err(DbError::Serialization(_))));
    }
}
