//! HTTP client for the i2pd web console.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::trace;

use crate::config::ConsoleConfig;

/// Errors that turn a scrape into `i2pd_up 0`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid console url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http status {0}")]
    HttpStatus(u16),
}

/// Fetches the console status page. One GET per scrape, no retries.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    client: Client,
    url: Url,
}

impl ConsoleClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ScrapeError> {
        let url = Url::parse(&config.url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("i2pd-exporter/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, url })
    }

    /// The console URL being scraped.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the status page body. Anything but `200 OK` is an error.
    pub async fn fetch(&self) -> Result<String, ScrapeError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        trace!(bytes = body.len(), "Fetched console page");
        Ok(body)
    }
}
