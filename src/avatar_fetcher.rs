//! Outbound avatar image fetching

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: StatusCode },
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Configuration for the avatar fetcher
#[derive(Clone, Debug, Default)]
pub struct AvatarFetcherConfig {
    /// Overall request timeout. `None` keeps reqwest's defaults.
    pub timeout: Option<Duration>,
}

/// Fetches avatar images and buffers them fully in memory
#[derive(Clone)]
pub struct AvatarFetcher {
    client: Client,
}

impl AvatarFetcher {
    pub fn new(config: AvatarFetcherConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// Create with default configuration
    pub fn new_default() -> Result<Self, FetchError> {
        Self::new(AvatarFetcherConfig::default())
    }

    /// GET `url` and return the whole body. Any non-2xx status is an error.
    pub async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "image/webp,image/apng,image/*,*/*;q=0.8")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("Upstream responded with status {} for {}", status, url);
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        info!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}
