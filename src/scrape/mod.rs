//! Source adapters and shared HTTP plumbing
//!
//! Each adapter turns one external source (paper index, code-hosting
//! search, model-hub listing) into a batch of unified [`Item`]s. The
//! shared [`Fetcher`] applies a hard per-attempt timeout, a randomized
//! browser User-Agent, and bounded exponential backoff on rate limits.
//!
//! Adapters follow a partial-success policy: a fetch failure mid-batch
//! returns whatever was collected so far, and any single malformed
//! record is skipped with a warning rather than aborting the batch.

mod arxiv;
mod github;
mod huggingface;

pub use arxiv::ArxivAdapter;
pub use github::GithubAdapter;
pub use huggingface::HuggingFaceAdapter;

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::models::Item;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Total attempts per request (1 initial + 2 retries)
const MAX_ATTEMPTS: u32 = 3;

/// Pool of plausible browser identities, one picked per fetcher
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// A scraper source
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Origin system name, as recorded on emitted items
    fn name(&self) -> &str;

    /// Collect a batch of items. Implementations degrade internally:
    /// transient failures yield a partial (possibly empty) batch.
    async fn scrape(&self) -> Result<Vec<Item>>;
}

/// HTTP client with retry/backoff shared by all adapters
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    backoff_base: Duration,
}

impl Fetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(http.timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::Scrape(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            backoff_base: Duration::from_millis(http.backoff_base_ms),
        })
    }

    /// GET with bounded retry: rate-limit responses and transport errors
    /// are retried with exponential backoff up to [`MAX_ATTEMPTS`] total
    /// attempts; other HTTP error statuses fail immediately.
    pub async fn get_with_backoff(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            debug!(url, attempt, "Fetching");

            match self.client.get(url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status != StatusCode::TOO_MANY_REQUESTS {
                        return Err(Error::Scrape(format!("HTTP {}: {}", status, url)));
                    }
                    if attempt >= MAX_ATTEMPTS {
                        return Err(Error::RateLimited(url.to_string()));
                    }
                    warn!(url, attempt, "Rate limited, backing off");
                }
                Err(e) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(e.into());
                    }
                    warn!(url, attempt, error = %e, "Request failed, retrying");
                }
            }

            tokio::time::sleep(self.backoff_base * 2u32.pow(attempt - 1)).await;
        }
    }

    /// GET and decode a JSON body, with the same retry policy
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get_with_backoff(url, query).await?;
        Ok(response.json::<T>().await?)
    }
}
