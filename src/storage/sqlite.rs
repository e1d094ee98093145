//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DataStorage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DataStorage, StorageResult};
use crate::storage::HarvestRecord;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one record
    pub fn insert_record(&self, key: &str, payload: &Value, options: &Value) -> StorageResult<i64> {
        let payload = serde_json::to_string(payload)?;
        let options = serde_json::to_string(options)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.conn();
        conn.execute(
            "INSERT INTO records (key, payload, options, saved_at) VALUES (?1, ?2, ?3, ?4)",
            params![key, payload, options, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Total number of stored records
    pub fn count_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// The most recently saved record for `key`, if any
    pub fn latest_record(&self, key: &str) -> StorageResult<Option<HarvestRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, key, payload, options, saved_at FROM records
             WHERE key = ?1 ORDER BY id DESC LIMIT 1",
        )?;

        let row = stmt
            .query_row(params![key], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        match row {
            Some((id, key, payload, options, saved_at)) => Ok(Some(HarvestRecord {
                id,
                key,
                payload: serde_json::from_str(&payload)?,
                options: serde_json::from_str(&options)?,
                saved_at,
            })),
            None => Ok(None),
        }
    }

    /// Distinct keys stored so far, sorted
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT DISTINCT key FROM records ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[async_trait]
impl DataStorage for SqliteStorage {
    async fn save(&self, key: &str, payload: &Value, options: &Value) -> StorageResult<()> {
        let id = self.insert_record(key, payload, options)?;
        tracing::debug!(key, id, "record saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_read_back() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .save("http://a/1", &json!({"title": "One"}), &json!({"lang": "en"}))
            .await
            .unwrap();

        let record = storage.latest_record("http://a/1").unwrap().unwrap();
        assert_eq!(record.key, "http://a/1");
        assert_eq!(record.payload["title"], "One");
        assert_eq!(record.options["lang"], "en");
        assert!(storage.latest_record("http://a/2").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_repeated_saves_append() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        storage.save("k", &json!(1), &Value::Null).await.unwrap();
        storage.save("k", &json!(2), &Value::Null).await.unwrap();
        storage.save("j", &json!(3), &Value::Null).await.unwrap();

        assert_eq!(storage.count_records().unwrap(), 3);
        assert_eq!(storage.latest_record("k").unwrap().unwrap().payload, json!(2));
        assert_eq!(storage.keys().unwrap(), vec!["j".to_string(), "k".to_string()]);
    }

    #[test]
    fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.db");
        {
            let storage = SqliteStorage::new(&path).unwrap();
            storage
                .insert_record("http://a/1", &json!({"data": "<p/>"}), &json!({}))
                .unwrap();
        }

        let reopened = SqliteStorage::new(&path).unwrap();
        assert_eq!(reopened.count_records().unwrap(), 1);
    }
}
