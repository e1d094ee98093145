use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that runs can be matched to the exact configuration.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID: &str = r#"
id = "news"
delay = 1000

[limit.context]
max = 2
pages = 3

[[categories]]
tags = ["tech"]
uri = "https://example.com/tech"
options = { lang = "en" }

[[categories]]
uri = "https://example.com/sport"

[extract]
detail-links = "a.item"

[extract.fields]
title = "h1"

[output]
database-path = "./harvest.db"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.id, "news");
        assert_eq!(config.delay_ms(), 1000);
        assert_eq!(config.max_contexts(), Some(2));
        assert_eq!(config.pages_per_handle(), 3);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].tags, vec!["tech".to_string()]);
        assert_eq!(config.categories[0].options["lang"], "en");
        assert!(config.categories[1].tags.is_empty());
        assert_eq!(config.extract.detail_links, "a.item");
        assert_eq!(config.extract.fields["title"], "h1");
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = parse_config(
            r#"
id = "minimal"

[[categories]]
uri = "https://example.com/"

[output]
database-path = "./harvest.db"
"#,
        )
        .unwrap();

        assert_eq!(config.delay_ms(), 30_000);
        assert_eq!(config.pages_per_handle(), 5);
        assert_eq!(config.max_contexts(), None);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.extract.detail_links, "a[href]");
    }

    #[test]
    fn test_zero_pages_falls_back_to_default() {
        let config = parse_config(
            r#"
id = "zero"
delay = 0

[limit.context]
pages = 0

[[categories]]
uri = "https://example.com/"

[output]
database-path = "./harvest.db"
"#,
        )
        .unwrap();

        assert_eq!(config.pages_per_handle(), 5);
        assert_eq!(config.delay_ms(), 0);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let result = parse_config(
            r#"
id = "no-categories"

[output]
database-path = "./harvest.db"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config(VALID);
        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let other = create_temp_config("id = \"other\"");
        assert_ne!(hash1, compute_config_hash(other.path()).unwrap());
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(VALID);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.id, "news");
        assert_eq!(hash.len(), 64);
    }
}
