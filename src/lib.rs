//! List-Harvester: a recurring two-tier crawl orchestrator
//!
//! This crate walks a set of category pages, discovers detail items on each,
//! harvests every detail item through a bounded pool of concurrent workers and
//! hands the results to a storage sink. A run repeats on a fixed delay, or
//! stops after one cycle when configured with no delay.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod runner;
pub mod storage;

use thiserror::Error;

/// Main error type for List-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation to {uri} failed: {message}")]
    Navigation { uri: String, message: String },

    #[error("Extraction on {uri} failed: {message}")]
    Extraction { uri: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Hook panicked on {uri}: {message}")]
    Panicked { uri: String, message: String },

    #[error("Page pool error: {0}")]
    PagePool(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Builds a navigation error for `uri`
    pub fn navigation(uri: impl Into<String>, message: impl ToString) -> Self {
        Self::Navigation {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    /// Builds an extraction error for `uri`
    pub fn extraction(uri: impl Into<String>, message: impl ToString) -> Self {
        Self::Extraction {
            uri: uri.into(),
            message: message.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for List-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use browser::{HttpPagePool, MaxPagePool, Page, PagePool};
pub use config::Config;
pub use crawler::SelectorCrawler;
pub use runner::{CycleStats, Harvest, ListCrawler, ListRunner, Task, TaskStack};
pub use storage::{DataStorage, SqliteStorage};
