//! HTML helpers for selector-driven extraction
//!
//! This module handles:
//! - Selecting detail links on a category page and resolving them
//! - Selecting named text fields on a detail page

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashSet;
use url::Url;

/// Returns the absolute http(s) targets of every element matched by `selector`
///
/// Duplicates within one document are dropped; document order is kept.
///
/// # Example
///
/// ```no_run
/// use list_harvester::crawler::select_links;
/// use scraper::Selector;
/// use url::Url;
///
/// let html = r#"<ul><li><a class="item" href="/1">One</a></li></ul>"#;
/// let selector = Selector::parse("a.item").unwrap();
/// let base = Url::parse("https://example.com/list").unwrap();
/// assert_eq!(select_links(html, &selector, &base), vec!["https://example.com/1"]);
/// ```
pub fn select_links(html: &str, selector: &Selector, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Extracts the trimmed text of the first match of each named selector
///
/// Fields without a match map to `null`.
pub fn select_fields(html: &str, fields: &[(String, Selector)]) -> Map<String, Value> {
    let document = Html::parse_document(html);

    fields
        .iter()
        .map(|(name, selector)| {
            let value = document
                .select(selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
                .map(Value::String)
                .unwrap_or(Value::Null);
            (name.clone(), value)
        })
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
