//! Static tier: a single reqwest GET

use super::StaticFetcher;
use crate::config::ScrapeConfig;
use crate::error::{Error, Result, StaticFetchError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// reqwest-backed static fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_ms: u64,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and user agent
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.static_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_ms: config.static_timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl StaticFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> std::result::Result<String, StaticFetchError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                StaticFetchError::Timeout(self.timeout_ms)
            } else {
                StaticFetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        debug!("Fetch response status: {}", status);
        if !status.is_success() {
            return Err(StaticFetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                StaticFetchError::Timeout(self.timeout_ms)
            } else {
                StaticFetchError::Body(e.to_string())
            }
        })
    }
}
