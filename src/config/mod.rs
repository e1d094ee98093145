//! Configuration module for List-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use list_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Runner {} recycles pages every {} uses", config.id, config.pages_per_handle());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryEntry, Config, ContextLimit, ExtractConfig, HttpConfig, LimitConfig, OutputConfig,
    DEFAULT_DELAY_MS, DEFAULT_PAGES_PER_HANDLE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
