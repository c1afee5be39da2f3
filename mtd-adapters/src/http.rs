//! Shared HTTP transport for source adapters
//!
//! One GET per poll, bounded by a connect timeout plus a read budget. Any
//! failure is absorbed here: the caller just sees "no new data" and the next
//! poll tries again.

use mtd_core::{adapter::SourceAdapter, model::Snapshot};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(connect_timeout + read_timeout)
            .user_agent(concat!("mission-telemetry/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> reqwest::Result<Self> {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// GET `url` and return the body as text; non-2xx is an error
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(transport)
    }

    /// Run one adapter poll: request, then parse. `None` means no new data.
    pub async fn fetch_snapshot<A: SourceAdapter + ?Sized>(&self, adapter: &A) -> Option<Snapshot> {
        let Some(url) = adapter.request_url() else {
            debug!("{}: nothing to fetch", adapter.name());
            return None;
        };

        let body = match self.fetch_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("{}: {}", adapter.name(), e);
                return None;
            }
        };

        let snapshot = adapter.parse(&body);
        if snapshot.is_none() {
            debug!("{}: unusable payload ({} bytes)", adapter.name(), body.len());
        }
        snapshot
    }
}
