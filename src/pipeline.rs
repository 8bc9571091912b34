//! Extraction pipeline
//!
//! Resolves request content (plain text verbatim, or URL through the
//! fetch strategy and content extractor), then calls the model and turns
//! its answer into a [`CompanyRecord`]. Without a model credential the
//! pipeline answers with [`CompanyRecord::placeholder`] and never contacts
//! the provider.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::extraction::ContentExtractor;
use crate::fetch::FetchStrategy;
use crate::llm::{compose_document, parse_or_degrade, CompletionClient, OpenAiClient, SYSTEM_PROMPT};
use crate::record::{CompanyRecord, ExtractionRequest, InputPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// A record plus response-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    /// The extracted (or placeholder, or degraded) record
    #[serde(flatten)]
    pub record: CompanyRecord,
    /// When the extraction finished
    pub extracted_at: DateTime<Utc>,
    /// Set only when the record is the offline placeholder
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl ExtractionOutcome {
    fn now(record: CompanyRecord, placeholder: bool) -> Self {
        Self {
            record,
            extracted_at: Utc::now(),
            placeholder,
        }
    }
}

/// End-to-end company profile extractor
#[derive(Clone)]
pub struct Extractor {
    fetch: FetchStrategy,
    content: ContentExtractor,
    model: Option<Arc<dyn CompletionClient>>,
}

impl Extractor {
    /// Assemble from parts; `model: None` selects offline mode
    pub fn new(
        fetch: FetchStrategy,
        content: ContentExtractor,
        model: Option<Arc<dyn CompletionClient>>,
    ) -> Self {
        Self {
            fetch,
            content,
            model,
        }
    }

    /// Production wiring from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetch = FetchStrategy::new(&config.scrape, config.browser.clone())?;
        let content = ContentExtractor::new(&config.scrape);

        let model: Option<Arc<dyn CompletionClient>> = if config.llm.has_credential() {
            Some(Arc::new(OpenAiClient::new(&config.llm)?))
        } else {
            warn!("No valid model credential configured; responses will be placeholders");
            None
        };

        Ok(Self::new(fetch, content, model))
    }

    /// True when no model client is configured
    pub fn is_offline(&self) -> bool {
        self.model.is_none()
    }

    /// Validate a wire payload and extract
    pub async fn extract_payload(&self, payload: InputPayload) -> Result<ExtractionOutcome> {
        let request = ExtractionRequest::try_from(payload)?;
        self.extract(request).await
    }

    /// Run one extraction
    pub async fn extract(&self, request: ExtractionRequest) -> Result<ExtractionOutcome> {
        let request_id = Uuid::new_v4();
        let span = info_span!("extract", %request_id, kind = request.kind());
        self.extract_inner(request).instrument(span).await
    }

    async fn extract_inner(&self, request: ExtractionRequest) -> Result<ExtractionOutcome> {
        let start = Instant::now();

        let Some(model) = &self.model else {
            info!("Using placeholder response (no valid model credential)");
            return Ok(ExtractionOutcome::now(CompanyRecord::placeholder(), true));
        };

        let payload = self.resolve_content(request).await?;
        info!("Prompt payload: {} chars", payload.chars().count());

        let content = model.complete(SYSTEM_PROMPT, &payload).await?;
        let record = parse_or_degrade(&content);

        info!(
            "Extraction finished in {}ms (degraded: {})",
            start.elapsed().as_millis(),
            record.is_parse_failure()
        );
        Ok(ExtractionOutcome::now(record, false))
    }

    async fn resolve_content(&self, request: ExtractionRequest) -> Result<String> {
        match request {
            ExtractionRequest::PlainText(text) => Ok(text),
            ExtractionRequest::Url(url) => {
                let page = self.fetch.fetch_html(&url).await?;
                info!("Fetched {} via {:?}", page.url, page.source);

                let document = self.content.extract(&page.html);
                if document.text.is_empty() && document.title.is_empty() {
                    return Err(Error::internal(format!(
                        "no readable content found at {}",
                        page.url
                    )));
                }
                Ok(compose_document(&document))
            }
        }
    }
}
