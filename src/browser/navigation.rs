//! Page navigation functionality
//!
//! This module handles URL validation and bounded navigation with a
//! readiness condition followed by a fixed settle delay.

use crate::browser::PageHandle;
use crate::error::{Error, NavigationError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

/// Options for page navigation
#[derive(Debug, Clone)]
pub struct NavigationOptions {
    /// Timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Wait until condition (default: networkidle0)
    pub wait_until: WaitUntil,
    /// Fixed delay after readiness, before the DOM is read (default: 2000)
    pub settle_delay_ms: u64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            wait_until: WaitUntil::NetworkIdle0,
            settle_delay_ms: 2000,
        }
    }
}

/// Condition to wait for after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Wait until load event fires
    Load,
    /// Wait until DOMContentLoaded event fires
    DomContentLoaded,
    /// Wait until network is idle (0 connections for 500ms)
    NetworkIdle0,
}

/// Result of a navigation operation
#[derive(Debug)]
pub struct NavigationResult {
    /// Final URL after any redirects
    pub final_url: String,
    /// Navigation duration in milliseconds, settle delay included
    pub duration_ms: u64,
}

/// URL validation utilities
pub struct UrlValidator;

impl UrlValidator {
    /// Parse `url` as an absolute http(s) URL
    pub fn validate(url: &str) -> std::result::Result<Url, String> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("URL cannot be empty".to_string());
        }

        let parsed = Url::parse(trimmed).map_err(|e| format!("{}: {}", e, trimmed))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("URL must start with http:// or https://: {}", trimmed));
        }

        if parsed.host_str().is_none() {
            return Err(format!("URL has no host: {}", trimmed));
        }

        if trimmed.len() > 2048 {
            return Err("URL exceeds maximum length of 2048 characters".to_string());
        }

        Ok(parsed)
    }
}

/// Page navigator
pub struct PageNavigator;

impl PageNavigator {
    /// Navigate to a URL, wait for readiness, then settle
    #[instrument(skip(page, options))]
    pub async fn goto(
        page: &PageHandle,
        url: &str,
        options: Option<NavigationOptions>,
    ) -> Result<NavigationResult> {
        let opts = options.unwrap_or_default();
        let start = Instant::now();

        UrlValidator::validate(url).map_err(NavigationError::InvalidUrl)?;

        info!("Navigating to: {}", url);

        // Load and readiness share one budget.
        let load = async {
            page.page
                .goto(url)
                .await
                .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;
            Self::wait_for_ready(&page.page, opts.wait_until).await
        };
        tokio::time::timeout(Duration::from_millis(opts.timeout_ms), load)
            .await
            .map_err(|_| NavigationError::Timeout(opts.timeout_ms))??;

        if opts.settle_delay_ms > 0 {
            debug!("Settling for {}ms", opts.settle_delay_ms);
            tokio::time::sleep(Duration::from_millis(opts.settle_delay_ms)).await;
        }

        let final_url = page
            .page
            .url()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(NavigationResult {
            final_url,
            duration_ms,
        })
    }

    /// Wait for page to be ready based on wait_until condition
    async fn wait_for_ready(page: &chromiumoxide::Page, wait_until: WaitUntil) -> Result<()> {
        let script = match wait_until {
            WaitUntil::Load => {
                r#"
                    new Promise(resolve => {
                        if (document.readyState === 'complete') {
                            resolve(true);
                        } else {
                            window.addEventListener('load', () => resolve(true));
                        }
                    })
                "#
            }
            WaitUntil::DomContentLoaded => {
                r#"
                    new Promise(resolve => {
                        if (document.readyState !== 'loading') {
                            resolve(true);
                        } else {
                            document.addEventListener('DOMContentLoaded', () => resolve(true));
                        }
                    })
                "#
            }
            WaitUntil::NetworkIdle0 => {
                // Approximated as load + 500ms quiet period; CDP has no
                // direct idle signal through the evaluate channel.
                r#"
                    new Promise(resolve => {
                        if (document.readyState === 'complete') {
                            setTimeout(() => resolve(true), 500);
                        } else {
                            window.addEventListener('load', () => {
                                setTimeout(() => resolve(true), 500);
                            });
                        }
                    })
                "#
            }
        };

        page.evaluate(script)
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}
