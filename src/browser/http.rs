//! HTTP-backed page pool
//!
//! A lightweight stand-in for a browser: navigation is a GET request whose
//! body, once fully read, is the settled document. Scripts are not executed.

use crate::browser::{Page, PagePool};
use crate::config::HttpConfig;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Example
///
/// ```no_run
/// use list_harvester::browser::build_http_client;
/// use list_harvester::config::HttpConfig;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page pool that hands out [`HttpPage`]s sharing one connection pool
pub struct HttpPagePool {
    client: Client,
    outstanding: AtomicUsize,
}

impl HttpPagePool {
    pub fn new(config: &HttpConfig) -> Result<Self, HarvestError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Number of pages currently lent out
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PagePool for HttpPagePool {
    async fn acquire(&self, owner: &str) -> Result<Box<dyn Page>, HarvestError> {
        let count = self.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(owner, outstanding = count, "page acquired");
        Ok(Box::new(HttpPage::new(self.client.clone())))
    }

    async fn release(&self, owner: &str, page: Box<dyn Page>) {
        drop(page);
        let count = self.outstanding.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        tracing::trace!(owner, outstanding = count, "page released");
    }
}

/// A single HTTP "tab": remembers the last document it loaded
pub struct HttpPage {
    client: Client,
    url: Option<String>,
    body: Option<String>,
}

impl HttpPage {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: None,
            body: None,
        }
    }
}

#[async_trait]
impl Page for HttpPage {
    async fn navigate(&mut self, uri: &str) -> Result<(), HarvestError> {
        // A failed navigation leaves the page blank rather than on the old document.
        self.url = None;
        self.body = None;

        let response = self.client.get(uri).send().await.map_err(|e| {
            if e.is_timeout() {
                HarvestError::navigation(uri, "request timeout")
            } else if e.is_connect() {
                HarvestError::navigation(uri, "connection refused")
            } else {
                HarvestError::navigation(uri, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::navigation(uri, format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| HarvestError::navigation(uri, e))?;

        self.url = Some(final_url);
        self.body = Some(body);
        Ok(())
    }

    async fn content(&mut self) -> Result<String, HarvestError> {
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(HarvestError::extraction(
                self.url.clone().unwrap_or_default(),
                "no document loaded",
            )),
        }
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
