//! Rendered DOM capture
//!
//! Serializes the live document of a page back to HTML.

use crate::browser::PageHandle;
use crate::error::{CaptureError, Result};
use tracing::{debug, instrument};

/// Page capture functionality
pub struct PageCapture;

impl PageCapture {
    /// Capture the fully rendered document as HTML
    #[instrument(skip(page))]
    pub async fn html(page: &PageHandle) -> Result<String> {
        let html: String = page
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(|e| CaptureError::HtmlFailed(e.to_string()))?
            .into_value()
            .map_err(|e| CaptureError::HtmlFailed(e.to_string()))?;

        debug!("HTML captured: {} bytes", html.len());
        Ok(html)
    }
}
