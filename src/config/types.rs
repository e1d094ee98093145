use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Delay between cycles when none is configured (milliseconds)
pub const DEFAULT_DELAY_MS: i64 = 30_000;

/// Page-handle recycle threshold when none (or zero) is configured
pub const DEFAULT_PAGES_PER_HANDLE: usize = 5;

/// Main configuration structure for List-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identifier used in logs and as the page pool owner key
    pub id: String,

    /// Milliseconds between cycles; values below 1 run a single cycle
    #[serde(default)]
    pub delay: Option<i64>,

    #[serde(default)]
    pub limit: LimitConfig,

    /// Category entry points, seeded in order at the start of every cycle
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    pub output: OutputConfig,
}

impl Config {
    /// Inter-cycle delay in milliseconds, falling back to the default
    pub fn delay_ms(&self) -> i64 {
        self.delay.unwrap_or(DEFAULT_DELAY_MS)
    }

    /// Uses per page handle before it is recycled; also caps detail workers
    pub fn pages_per_handle(&self) -> usize {
        match self.limit.context.pages {
            Some(pages) if pages > 0 => pages,
            _ => DEFAULT_PAGES_PER_HANDLE,
        }
    }

    /// Maximum outstanding page handles, if capped
    pub fn max_contexts(&self) -> Option<usize> {
        self.limit.context.max
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitConfig {
    #[serde(default)]
    pub context: ContextLimit,
}

/// Limits applied to browsing contexts (page handles)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextLimit {
    /// Maximum concurrently outstanding page handles
    #[serde(default)]
    pub max: Option<usize>,

    /// Page-handle recycle threshold
    #[serde(default)]
    pub pages: Option<usize>,
}

/// A category entry point
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    #[serde(default)]
    pub tags: Vec<String>,

    pub uri: String,

    /// Pass-through options handed to extraction and stored with results
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// HTTP settings for the built-in page pool
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("list-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Selectors driving the built-in selector crawler
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// CSS selector matching detail links on a category page
    #[serde(rename = "detail-links", default = "default_detail_links")]
    pub detail_links: String,

    /// Payload field name -> CSS selector on a detail page
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            detail_links: default_detail_links(),
            fields: BTreeMap::new(),
        }
    }
}

fn default_detail_links() -> String {
    "a[href]".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
