//! Error types for Company Lens
//!
//! This module provides the error hierarchy used across the fetch,
//! extraction, and model-call stages, built on `thiserror`.

use thiserror::Error;

/// The main error type for Company Lens operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed request input (client's fault, never retried)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Static and/or rendered page acquisition failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// HTML serialization errors
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Model provider transport or API errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Empty or unusable model output
    #[error("Model response error: {0}")]
    ModelResponse(String),

    /// A bounded operation exceeded its time limit
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Configured bound in milliseconds
        timeout_ms: u64,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Catch-all for unexpected failures
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Page acquisition failure: the static tier was abandoned and the render
/// fallback failed too
#[derive(Error, Debug)]
#[error("both fetch methods failed. static: {static_cause}. render: {render_cause}")]
pub struct FetchError {
    /// Why the static tier was abandoned
    pub static_cause: StaticFetchError,
    /// Why the render tier failed
    pub render_cause: String,
}

/// Reasons the static tier was abandoned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StaticFetchError {
    /// Request exceeded the static timeout
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Connection, DNS or TLS failure
    #[error("network error: {0}")]
    Network(String),

    /// Body could not be read
    #[error("failed to read body: {0}")]
    Body(String),

    /// Body loaded but carried too little visible text
    #[error("body text too short ({visible_chars} < {threshold} chars)")]
    Sparse {
        /// Visible characters found in the body
        visible_chars: usize,
        /// Escalation threshold
        threshold: usize,
    },
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Failed to override the page user agent
    #[error("Failed to set user agent: {0}")]
    UserAgentFailed(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Navigation timeout
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// HTML capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    /// HTML capture failed
    #[error("HTML capture failed: {0}")]
    HtmlFailed(String),
}

/// Model provider errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// Provider rejected the request
    #[error("provider returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Transport failure talking to the provider
    #[error("request failed: {0}")]
    Transport(String),

    /// Provider response did not match the completion shape
    #[error("malformed completion: {0}")]
    Malformed(String),
}

/// Record editing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Adding would exceed the office cap
    #[error("at most {0} offices allowed")]
    OfficeLimit(usize),

    /// No office with this id
    #[error("no office with id {0}")]
    UnknownOffice(u64),
}

/// Result type alias for Company Lens operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an internal error from a string
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Create an invalid-input error from a string
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, timeout_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// True when the failure is the caller's fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// True for timeout-classified failures
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Browser(BrowserError::LaunchFailed("no chrome".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chrome"));
    }

    #[test]
    fn test_both_fetch_error_carries_both_causes() {
        let err = FetchError {
            static_cause: StaticFetchError::Status { status: 503 },
            render_cause: "Navigation timed out after 30000ms".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("30000ms"));
        assert!(!Error::from(err).is_timeout());
    }

    #[test]
    fn test_timeout_classification() {
        let err = Error::timeout("model call", 60_000);
        assert!(err.is_timeout());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "model call timed out after 60000ms");
    }

    #[test]
    fn test_invalid_input_is_client_error() {
        let err = Error::invalid_input("no content to process");
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid input: no content to process");
    }
}
