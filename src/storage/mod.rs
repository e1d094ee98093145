//! Storage module for persisting harvested results
//!
//! This module handles:
//! - The `DataStorage` sink interface used by detail workers
//! - A SQLite implementation that appends one row per harvested item

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{DataStorage, StorageError, StorageResult};

use serde_json::Value;
use std::path::Path;

/// Opens or creates the SQLite database at `path`
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A stored harvest result
#[derive(Debug, Clone)]
pub struct HarvestRecord {
    pub id: i64,
    pub key: String,
    pub payload: Value,
    pub options: Value,
    pub saved_at: String,
}
