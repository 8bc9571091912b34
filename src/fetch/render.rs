//! Render tier: one isolated headless browser per call

use super::PageRenderer;
use crate::browser::{
    BrowserConfig, BrowserController, NavigationOptions, PageCapture, PageNavigator, WaitUntil,
};
use crate::config::ScrapeConfig;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{info, instrument, warn};
use url::Url;

/// Chromium-backed renderer
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    browser: BrowserConfig,
    navigation: NavigationOptions,
}

impl ChromiumRenderer {
    /// Renderer using the scrape timeouts and user agent
    pub fn new(config: &ScrapeConfig, mut browser: BrowserConfig) -> Self {
        if browser.user_agent.is_none() {
            browser.user_agent = Some(config.user_agent.clone());
        }
        browser.timeout_ms = config.render_timeout.as_millis() as u64;

        let navigation = NavigationOptions {
            timeout_ms: browser.timeout_ms,
            wait_until: WaitUntil::NetworkIdle0,
            settle_delay_ms: config.settle_delay.as_millis() as u64,
        };

        Self {
            browser,
            navigation,
        }
    }

    /// Navigation settings used for each render
    pub fn navigation(&self) -> &NavigationOptions {
        &self.navigation
    }

    async fn render_in(&self, controller: &BrowserController, url: &Url) -> Result<String> {
        let page = controller.new_page().await?;
        let nav = PageNavigator::goto(&page, url.as_str(), Some(self.navigation.clone())).await?;
        if nav.final_url != url.as_str() {
            info!("Redirected to {}", nav.final_url);
        }
        info!("Page ready in {}ms", nav.duration_ms);
        PageCapture::html(&page).await
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    #[instrument(skip(self), fields(url = %url))]
    async fn render(&self, url: &Url) -> Result<String> {
        info!("Starting headless render");
        let controller = BrowserController::with_config(self.browser.clone()).await?;

        let result = self.render_in(&controller, url).await;

        // Released on every path; a drop mid-await still kills the process.
        if let Err(e) = controller.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }

        result
    }
}
