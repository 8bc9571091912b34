//! Client for a running extraction server
//!
//! Every failure is mapped into an [`ApiError`] with a numeric status, a
//! message suitable for display, and optional details. Two statuses are
//! synthetic: `408` when the call exceeds its 60 second budget and `0`
//! when the server cannot be reached at all.

use crate::config::MODEL_TIMEOUT;
use crate::error::{Error, Result};
use crate::pipeline::ExtractionOutcome;
use crate::record::InputPayload;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failure seen by a caller of the extraction API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// HTTP status, `408` for timeout, `0` for unreachable server
    pub status: u16,
    /// Human-readable message
    pub message: String,
    /// Underlying cause, when known
    pub details: Option<String>,
}

impl ApiError {
    fn new<S: Into<String>>(status: u16, message: S, details: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details,
        }
    }

    fn timed_out(timeout: Duration) -> Self {
        Self::new(
            408,
            "Request timed out",
            Some(format!(
                "The extraction did not complete within {} seconds",
                timeout.as_secs()
            )),
        )
    }

    fn network(cause: &reqwest::Error) -> Self {
        debug!("Connection failure: {}", cause);
        Self::new(
            0,
            "Network error",
            Some("Cannot reach the server. Check your connection.".to_string()),
        )
    }

    fn unexpected<E: std::fmt::Display>(cause: E) -> Self {
        Self::new(500, "Unexpected error", Some(cause.to_string()))
    }

    /// True for the synthetic timeout status
    pub fn is_timeout(&self) -> bool {
        self.status == 408
    }

    /// True for the synthetic unreachable-server status
    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

#[derive(Deserialize)]
struct WireError {
    error: Option<String>,
    details: Option<String>,
}

/// Map a non-success response body into an [`ApiError`]
fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let reason = status.canonical_reason().map(str::to_string);
    match serde_json::from_slice::<WireError>(body) {
        Ok(wire) => ApiError::new(
            status.as_u16(),
            wire.error.unwrap_or_else(|| "Request failed".to_string()),
            wire.details.or(reason),
        ),
        Err(_) => ApiError::new(
            status.as_u16(),
            format!("Server error ({})", status.as_u16()),
            reason,
        ),
    }
}

/// HTTP client for `POST /api/extract`
#[derive(Debug, Clone)]
pub struct ExtractClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ExtractClient {
    /// Client for a server at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: MODEL_TIMEOUT,
        })
    }

    /// Override the 60 second budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit a payload and wait for the outcome
    #[instrument(skip(self, payload), fields(base_url = %self.base_url))]
    pub async fn extract(
        &self,
        payload: &InputPayload,
    ) -> std::result::Result<ExtractionOutcome, ApiError> {
        let result = tokio::time::timeout(self.timeout, self.execute(payload))
            .await
            .unwrap_or_else(|_| Err(ApiError::timed_out(self.timeout)));

        if let Err(e) = &result {
            warn!("Extraction API call failed: {}", e);
        }
        result
    }

    async fn execute(
        &self,
        payload: &InputPayload,
    ) -> std::result::Result<ExtractionOutcome, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/extract", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(|e| self.classify(e))?;
            return Err(status_error(status, &body));
        }

        response
            .json::<ExtractionOutcome>()
            .await
            .map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::timed_out(self.timeout)
        } else if err.is_connect() {
            ApiError::network(&err)
        } else {
            ApiError::unexpected(err)
        }
    }
}
