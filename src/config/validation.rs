use crate::config::types::{CategoryEntry, Config, ExtractConfig, HttpConfig, LimitConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.id.trim().is_empty() {
        return Err(ConfigError::Validation("id cannot be empty".to_string()));
    }

    validate_limits(&config.limit)?;
    validate_categories(&config.categories)?;
    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_limits(limit: &LimitConfig) -> Result<(), ConfigError> {
    if let Some(max) = limit.context.max {
        if max < 1 {
            return Err(ConfigError::Validation(format!(
                "limit.context.max must be >= 1, got {}",
                max
            )));
        }
    }
    Ok(())
}

/// Validates category entry points
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category is required".to_string(),
        ));
    }

    for category in categories {
        validate_uri(&category.uri)?;
    }

    Ok(())
}

fn validate_uri(uri: &str) -> Result<(), ConfigError> {
    if uri.is_empty() {
        return Err(ConfigError::InvalidUrl("category uri cannot be empty".to_string()));
    }

    let url = Url::parse(uri)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid category uri '{}': {}", uri, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Category uri '{}' must use http or https",
            uri
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "http timeouts must be >= 1s, got {}s / {}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }
    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    validate_selector(&config.detail_links)?;
    for selector in config.fields.values() {
        validate_selector(selector)?;
    }
    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uri() {
        assert!(validate_uri("https://example.com/list").is_ok());
        assert!(validate_uri("http://a").is_ok());

        assert!(validate_uri("").is_err());
        assert!(validate_uri("/relative/path").is_err());
        assert!(validate_uri("ftp://example.com/").is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("a.item").is_ok());
        assert!(validate_selector("div > h1").is_ok());

        assert!(validate_selector("").is_err());
        assert!(validate_selector("a[").is_err());
    }

    #[test]
    fn test_validate_limits() {
        let mut limit = LimitConfig::default();
        assert!(validate_limits(&limit).is_ok());

        limit.context.max = Some(0);
        assert!(validate_limits(&limit).is_err());

        limit.context.max = Some(4);
        assert!(validate_limits(&limit).is_ok());
    }
}
