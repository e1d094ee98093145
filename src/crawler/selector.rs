use crate::browser::{extract, Page};
use crate::config::ExtractConfig;
use crate::crawler::parser::{select_fields, select_links};
use crate::runner::{Harvest, ListCrawler, Task, TaskStack};
use crate::{ConfigError, HarvestError};
use async_trait::async_trait;
use scraper::Selector;
use serde_json::{json, Value};
use url::Url;

/// Crawler driven entirely by CSS selectors from configuration
///
/// Category pages yield one detail task per link matched by the detail-link
/// selector. Detail pages yield an object of named field texts, or the raw
/// markup under `data` when no fields are configured.
pub struct SelectorCrawler {
    detail_links: Selector,
    fields: Vec<(String, Selector)>,
}

impl SelectorCrawler {
    pub fn new(detail_links: Selector, fields: Vec<(String, Selector)>) -> Self {
        Self {
            detail_links,
            fields,
        }
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self, ConfigError> {
        let detail_links = parse_selector(&config.detail_links)?;
        let fields = config
            .fields
            .iter()
            .map(|(name, selector)| Ok((name.clone(), parse_selector(selector)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self::new(detail_links, fields))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

#[async_trait]
impl ListCrawler for SelectorCrawler {
    async fn category_extract(
        &self,
        page: &mut dyn Page,
        task: &Task,
        details: &TaskStack,
    ) -> Result<bool, HarvestError> {
        let base = page.url().unwrap_or(task.uri.as_str()).to_string();
        let base = Url::parse(&base).map_err(|e| HarvestError::extraction(&task.uri, e))?;

        let links = extract(page, |html| Ok(select_links(html, &self.detail_links, &base))).await?;
        let found = links.len();
        details.extend(
            links
                .into_iter()
                .map(|link| Task::new(task.tags.clone(), link).with_options(task.options.clone())),
        );

        tracing::debug!(uri = %task.uri, found, "detail links collected");
        Ok(found > 0)
    }

    async fn detail_extract(&self, page: &mut dyn Page, task: &Task) -> Result<Harvest, HarvestError> {
        let payload = extract(page, |html| {
            if self.fields.is_empty() {
                Ok(json!({ "data": html }))
            } else {
                Ok(Value::Object(select_fields(html, &self.fields)))
            }
        })
        .await?;

        Ok(Harvest {
            payload,
            options: Value::Object(task.options.clone()),
        })
    }
}
