//! Storage traits and error types
//!
//! This module defines the sink interface harvested results are written to,
//! and its error type.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Sink for harvested results
///
/// Each detail task is saved exactly once per cycle, keyed by the address it
/// was harvested from. Implementations must be shareable across workers.
#[async_trait]
pub trait DataStorage: Send + Sync {
    /// Durably records `payload` and its pass-through `options` under `key`
    async fn save(&self, key: &str, payload: &Value, options: &Value) -> StorageResult<()>;
}
