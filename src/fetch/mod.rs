//! Two-tier page acquisition
//!
//! A cheap static request handles server-rendered pages. When it fails,
//! or returns a body with too little visible text to be the real page,
//! the URL is rendered once in a headless browser. There is no further
//! retry: if the render also fails, both causes are reported together.
//!
//! ```text
//! url ──▶ validate ──▶ StaticFetcher ──ok, visible ≥ threshold──▶ HtmlPayload(Static)
//!                           │
//!                    err or sparse
//!                           ▼
//!                      PageRenderer ──ok──▶ HtmlPayload(Rendered)
//!                           │
//!                          err ──▶ FetchError { static, render }
//! ```

pub mod http;
pub mod render;

pub use http::HttpFetcher;
pub use render::ChromiumRenderer;

use crate::browser::{BrowserConfig, UrlValidator};
use crate::config::ScrapeConfig;
use crate::error::{Error, FetchError, Result, StaticFetchError};
use crate::extraction::visible_text_len;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Plain HTTP retrieval of a page
#[async_trait]
pub trait StaticFetcher: Send + Sync {
    /// Fetch `url` and return the response body
    async fn fetch(&self, url: &Url) -> std::result::Result<String, StaticFetchError>;
}

/// Full browser rendering of a page
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `url` and return the serialized DOM
    async fn render(&self, url: &Url) -> Result<String>;
}

/// Which tier produced the HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Plain HTTP response
    Static,
    /// Headless browser DOM
    Rendered,
}

/// HTML acquired for a URL
#[derive(Debug, Clone)]
pub struct HtmlPayload {
    /// The URL as validated
    pub url: String,
    /// Page HTML
    pub html: String,
    /// Tier that produced it
    pub source: FetchSource,
}

/// Static-first fetch with a single render fallback
#[derive(Clone)]
pub struct FetchStrategy {
    static_fetcher: Arc<dyn StaticFetcher>,
    renderer: Arc<dyn PageRenderer>,
    sparse_threshold: usize,
}

impl FetchStrategy {
    /// Build the production strategy: reqwest static tier, Chromium render tier
    pub fn new(config: &ScrapeConfig, browser: BrowserConfig) -> Result<Self> {
        Ok(Self::with_parts(
            Arc::new(HttpFetcher::new(config)?),
            Arc::new(ChromiumRenderer::new(config, browser)),
            config.sparse_threshold,
        ))
    }

    /// Build from explicit tiers
    pub fn with_parts(
        static_fetcher: Arc<dyn StaticFetcher>,
        renderer: Arc<dyn PageRenderer>,
        sparse_threshold: usize,
    ) -> Self {
        Self {
            static_fetcher,
            renderer,
            sparse_threshold,
        }
    }

    /// Acquire HTML for `url`
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<HtmlPayload> {
        let parsed = UrlValidator::validate(url).map_err(Error::InvalidInput)?;
        info!("Attempting static fetch: {}", parsed);

        let static_cause = match self.static_fetcher.fetch(&parsed).await {
            Ok(html) => {
                let visible = visible_text_len(&html);
                debug!("Static body: {} bytes, {} visible chars", html.len(), visible);
                if visible >= self.sparse_threshold {
                    info!("Static fetch successful");
                    return Ok(HtmlPayload {
                        url: parsed.to_string(),
                        html,
                        source: FetchSource::Static,
                    });
                }
                info!("Content too short, falling back to headless render");
                StaticFetchError::Sparse {
                    visible_chars: visible,
                    threshold: self.sparse_threshold,
                }
            }
            Err(e) => {
                warn!("Static fetch failed: {}", e);
                e
            }
        };

        match self.renderer.render(&parsed).await {
            Ok(html) => {
                info!("Render successful: {} bytes", html.len());
                Ok(HtmlPayload {
                    url: parsed.to_string(),
                    html,
                    source: FetchSource::Rendered,
                })
            }
            Err(render_err) => {
                error!("Render also failed: {}", render_err);
                Err(FetchError {
                    static_cause,
                    render_cause: render_err.to_string(),
                }
                .into())
            }
        }
    }
}
